//! Pool handle with an explicit init/shutdown lifecycle.

use log::debug;

use crate::buffer::replacer::ReplacementStrategy;
use crate::buffer::BufferPoolManager;
use crate::common::{BufferPoolConfig, Error, Result};
use crate::storage::{FilePageStore, PageStore};

/// A buffer pool handle that is either uninitialized or running.
///
/// `init` opens the page store and allocates the frames; `shutdown` flushes,
/// releases the frames and closes the store, after which the same handle can
/// be initialized again.
///
/// # Example
/// ```
/// use pagepool::{BufferPool, MemoryPageStore, PageId, ReplacementStrategy};
///
/// let mut pool = BufferPool::new();
/// pool.init_with_store(MemoryPageStore::new(), 4, ReplacementStrategy::Fifo)?;
///
/// let bpm = pool.manager_mut()?;
/// bpm.pin_page(PageId::new(0))?;
/// bpm.unpin_page(PageId::new(0))?;
///
/// pool.shutdown()?;
/// assert!(!pool.is_initialized());
/// # Ok::<(), pagepool::Error>(())
/// ```
pub struct BufferPool<S: PageStore = FilePageStore> {
    manager: Option<BufferPoolManager<S>>,
}

impl<S: PageStore> BufferPool<S> {
    /// An uninitialized handle.
    pub fn new() -> Self {
        Self { manager: None }
    }

    /// Initialize the pool over an already opened store.
    ///
    /// # Errors
    /// - `Error::AlreadyInitialized` if the handle is running
    /// - `Error::InvalidPoolSize` if `num_frames` is 0
    pub fn init_with_store(
        &mut self,
        store: S,
        num_frames: usize,
        strategy: ReplacementStrategy,
    ) -> Result<()> {
        if self.manager.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        self.manager = Some(BufferPoolManager::new(num_frames, strategy, store)?);
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.manager.is_some()
    }

    /// The running manager.
    ///
    /// # Errors
    /// `Error::NotInitialized` before `init` or after `shutdown`.
    pub fn manager(&self) -> Result<&BufferPoolManager<S>> {
        self.manager.as_ref().ok_or(Error::NotInitialized)
    }

    pub fn manager_mut(&mut self) -> Result<&mut BufferPoolManager<S>> {
        self.manager.as_mut().ok_or(Error::NotInitialized)
    }

    /// Flush and tear down the pool.
    ///
    /// If the manager refuses (pinned pages under the strict policy, or an
    /// I/O error) the pool stays initialized and usable.
    ///
    /// # Errors
    /// - `Error::NotInitialized` if there is nothing to shut down
    /// - whatever [`BufferPoolManager::shutdown`] returns
    pub fn shutdown(&mut self) -> Result<()> {
        self.manager_mut()?.shutdown()?;
        self.manager = None;
        debug!("Buffer pool released");
        Ok(())
    }
}

impl BufferPool<FilePageStore> {
    /// Open the page file named by `config` and initialize the pool.
    ///
    /// # Errors
    /// - `Error::AlreadyInitialized` if the handle is running
    /// - `Error::FileNotFound` if the page file doesn't exist
    /// - `Error::CorruptPageFile` if it isn't a valid page file
    /// - `Error::InvalidPoolSize` if `config.num_frames` is 0
    pub fn init(&mut self, config: &BufferPoolConfig) -> Result<()> {
        if self.manager.is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let store = FilePageStore::open(&config.page_file)?;
        let mut manager = BufferPoolManager::new(config.num_frames, config.strategy, store)?;
        manager.set_shutdown_policy(config.shutdown_policy);
        self.manager = Some(manager);
        Ok(())
    }
}

impl<S: PageStore> Default for BufferPool<S> {
    fn default() -> Self {
        Self::new()
    }
}
