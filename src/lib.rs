//! pagepool - a fixed-capacity page buffer pool with FIFO and LRU replacement.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Callers (record / index managers)              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │   BufferPool / SharedBufferPool (buffer/)                │   │
//! │  │      init + shutdown lifecycle, one lock per pool        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │   BufferPoolManager (buffer/)                            │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  Replacement: FIFO | LRU  (fixed at creation)    │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  │      FrameTable + residency index + statistics           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │   Storage Layer (storage/)                               │   │
//! │  │     PageStore: FilePageStore | MemoryPageStore           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - Buffer pool management and replacement policies
//! - [`storage`] - Page stores and the page type
//!
//! # Quick Start
//! ```no_run
//! use pagepool::{BufferPool, BufferPoolConfig, FilePageStore, PageId, ReplacementStrategy};
//!
//! // Create a page file once
//! FilePageStore::create("my_pages.db")?.close()?;
//!
//! let mut pool: BufferPool = BufferPool::new();
//! pool.init(&BufferPoolConfig::new("my_pages.db").with_strategy(ReplacementStrategy::Lru))?;
//!
//! let bpm = pool.manager_mut()?;
//! let handle = bpm.pin_page(PageId::new(0))?;
//! bpm.page_mut(&handle)?.as_mut_slice()[..5].copy_from_slice(b"hello");
//! bpm.mark_dirty(PageId::new(0))?;
//! bpm.unpin_page(PageId::new(0))?;
//!
//! pool.shutdown()?;
//! # Ok::<(), pagepool::Error>(())
//! ```

pub mod buffer;
pub mod common;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{BufferPoolConfig, Error, FrameId, PageId, Result, ShutdownPolicy};

pub use buffer::replacer::{ReplacementPolicy, ReplacementStrategy};
pub use buffer::{
    BufferPool, BufferPoolManager, BufferPoolStats, Frame, FrameTable, PageHandle, PinnedPage,
    SharedBufferPool, StatsSnapshot,
};
pub use storage::page::Page;
pub use storage::{FilePageStore, MemoryPageStore, PageStore};
