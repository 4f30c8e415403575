//! The page store contract consumed by the buffer pool.

use crate::common::{PageId, Result};
use crate::storage::page::Page;

/// Fixed-size block storage addressed by page number.
///
/// The buffer pool only ever talks to storage through this trait, so any
/// backend (a file, memory, a test double that fails on demand) can sit
/// under it.
///
/// Implementations must reject reads and writes at or past
/// [`block_count`](PageStore::block_count); the pool calls
/// [`ensure_capacity`](PageStore::ensure_capacity) before touching a page
/// that may not exist yet.
pub trait PageStore {
    /// Read block `page_id` into `page`.
    ///
    /// # Errors
    /// `Error::ReadNonExistingPage` if `page_id >= block_count()`.
    fn read_page(&mut self, page_id: PageId, page: &mut Page) -> Result<()>;

    /// Write `page` to block `page_id`.
    ///
    /// # Errors
    /// `Error::WriteFailed` if `page_id >= block_count()`.
    fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()>;

    /// Grow the store with zero-filled blocks until it holds at least
    /// `block_count` blocks. Never shrinks.
    fn ensure_capacity(&mut self, block_count: u32) -> Result<()>;

    /// Current number of blocks.
    fn block_count(&self) -> u32;

    /// Push buffered writes to stable storage.
    fn sync(&mut self) -> Result<()>;
}
