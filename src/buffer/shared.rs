//! Thread-shareable buffer pool and RAII page pins.
//!
//! - [`SharedBufferPool`] - one manager behind one mutex, cheap to clone
//! - [`PinnedPage`] - a pin that is released when dropped
//!
//! Every operation takes the pool lock for its whole duration, so callers on
//! different threads see pins, unpins and evictions in one serial order.

use std::sync::Arc;

use log::warn;
use parking_lot::Mutex;

use crate::buffer::{BufferPoolManager, PageHandle};
use crate::common::{PageId, Result};
use crate::storage::{FilePageStore, PageStore};

/// A [`BufferPoolManager`] shared between threads.
///
/// # Example
/// ```
/// use pagepool::{BufferPoolManager, MemoryPageStore, PageId, ReplacementStrategy, SharedBufferPool};
///
/// let bpm = BufferPoolManager::new(2, ReplacementStrategy::Lru, MemoryPageStore::new())?;
/// let pool = SharedBufferPool::new(bpm);
///
/// {
///     let page = pool.pin(PageId::new(0))?;
///     page.write(|bytes| bytes[0] = 9)?;
/// } // unpinned here
///
/// assert_eq!(pool.with(|bpm| bpm.fix_counts()), vec![0, 0]);
/// assert_eq!(pool.with(|bpm| bpm.dirty_flags()), vec![true, false]);
/// # Ok::<(), pagepool::Error>(())
/// ```
pub struct SharedBufferPool<S: PageStore = FilePageStore> {
    inner: Arc<Mutex<BufferPoolManager<S>>>,
}

impl<S: PageStore> SharedBufferPool<S> {
    pub fn new(manager: BufferPoolManager<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Pin `page_id` and return a guard that unpins it on drop.
    ///
    /// # Errors
    /// Same as [`BufferPoolManager::pin_page`].
    pub fn pin(&self, page_id: PageId) -> Result<PinnedPage<S>> {
        let handle = self.inner.lock().pin_page(page_id)?;
        Ok(PinnedPage {
            pool: Arc::clone(&self.inner),
            handle,
        })
    }

    /// Run `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut BufferPoolManager<S>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Recover the manager if this is the last reference to it.
    ///
    /// Outstanding [`PinnedPage`]s hold references too, so they must all be
    /// dropped first. Otherwise the pool is handed back unchanged.
    pub fn try_unwrap(self) -> std::result::Result<BufferPoolManager<S>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<S: PageStore> Clone for SharedBufferPool<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// A pinned page of a [`SharedBufferPool`].
///
/// The page stays resident as long as the guard lives. Access goes through
/// closures so the pool lock is never held across user code that outlives
/// the call.
pub struct PinnedPage<S: PageStore = FilePageStore> {
    pool: Arc<Mutex<BufferPoolManager<S>>>,
    handle: PageHandle,
}

impl<S: PageStore> PinnedPage<S> {
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.handle.page_id()
    }

    #[inline]
    pub fn handle(&self) -> PageHandle {
        self.handle
    }

    /// Read the page bytes.
    pub fn read<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let bpm = self.pool.lock();
        let page = bpm.page(&self.handle)?;
        Ok(f(page.as_slice()))
    }

    /// Modify the page bytes and mark the page dirty.
    pub fn write<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> Result<R> {
        let mut bpm = self.pool.lock();
        let result = f(bpm.page_mut(&self.handle)?.as_mut_slice());
        bpm.mark_dirty(self.handle.page_id())?;
        Ok(result)
    }
}

impl<S: PageStore> Drop for PinnedPage<S> {
    fn drop(&mut self) {
        if let Err(e) = self.pool.lock().unpin_page(self.handle.page_id()) {
            warn!("Failed to unpin {} on drop: {}", self.handle.page_id(), e);
        }
    }
}
