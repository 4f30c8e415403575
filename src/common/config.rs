//! Configuration constants and pool configuration.

use std::path::{Path, PathBuf};

use crate::buffer::replacer::ReplacementStrategy;

/// Size of a page in bytes (4KB).
///
/// Shared by the page store and the buffer pool: every block on disk and
/// every frame in memory is exactly this many bytes.
pub const PAGE_SIZE: usize = 4096;

/// Size of the header block at the start of every page file.
///
/// The header occupies one full block so data pages stay block-aligned.
pub const FILE_HEADER_SIZE: usize = PAGE_SIZE;

/// Maximum number of addressable pages.
///
/// `u32::MAX` is reserved for [`PageId::NO_PAGE`](crate::PageId::NO_PAGE).
pub const MAX_PAGES: u64 = u32::MAX as u64;

/// Number of frames used when a config doesn't say otherwise.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// What [`shutdown`](crate::BufferPoolManager::shutdown) does when pages are
/// still pinned.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Refuse with [`Error::BufferPoolInUse`](crate::Error::BufferPoolInUse).
    #[default]
    Strict,
    /// Write back pinned dirty pages too, log a warning and shut down anyway.
    ///
    /// For callers that pin without a matching unpin and rely on shutdown to
    /// clean up.
    FlushAndWarn,
}

/// Everything needed to initialize a [`BufferPool`](crate::BufferPool).
///
/// # Example
/// ```
/// use pagepool::{BufferPoolConfig, ReplacementStrategy};
///
/// let config = BufferPoolConfig::new("data.pages")
///     .with_num_frames(3)
///     .with_strategy(ReplacementStrategy::Lru);
/// assert_eq!(config.num_frames, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferPoolConfig {
    /// Page file backing the pool.
    pub page_file: PathBuf,
    /// Number of frames (pool capacity in pages).
    pub num_frames: usize,
    /// Replacement strategy, fixed for the pool's lifetime.
    pub strategy: ReplacementStrategy,
    /// Behavior of shutdown with pinned pages.
    pub shutdown_policy: ShutdownPolicy,
}

impl BufferPoolConfig {
    /// Config for `page_file` with default size, FIFO and strict shutdown.
    pub fn new<P: AsRef<Path>>(page_file: P) -> Self {
        Self {
            page_file: page_file.as_ref().to_path_buf(),
            num_frames: DEFAULT_POOL_SIZE,
            strategy: ReplacementStrategy::default(),
            shutdown_policy: ShutdownPolicy::default(),
        }
    }

    pub fn with_num_frames(mut self, num_frames: usize) -> Self {
        self.num_frames = num_frames;
        self
    }

    pub fn with_strategy(mut self, strategy: ReplacementStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_shutdown_policy(mut self, shutdown_policy: ShutdownPolicy) -> Self {
        self.shutdown_policy = shutdown_policy;
        self
    }
}
