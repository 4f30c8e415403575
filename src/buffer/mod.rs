//! Buffer pool management.
//!
//! The buffer pool is the in-memory cache between a page store and its
//! callers. It manages a fixed pool of frames, each holding one page.
//!
//! # Components
//! - [`BufferPoolManager`] - The main page cache
//! - [`BufferPool`] - Init/shutdown lifecycle around a manager
//! - [`SharedBufferPool`] / [`PinnedPage`] - Locked sharing and RAII pins
//! - [`Frame`] / [`FrameTable`] - Frame slots and the residency index
//! - [`BufferPoolStats`] - I/O and hit counters
//! - [`replacer`] - FIFO and LRU replacement policies

mod buffer_pool_manager;
mod frame;
mod frame_table;
mod page_handle;
mod pool;
pub mod replacer;
mod shared;
mod stats;

pub use buffer_pool_manager::BufferPoolManager;
pub use frame::Frame;
pub use frame_table::FrameTable;
pub use page_handle::PageHandle;
pub use pool::BufferPool;
pub use shared::{PinnedPage, SharedBufferPool};
pub use stats::{BufferPoolStats, StatsSnapshot};
