//! Buffer Pool Manager - the core page caching layer.
//!
//! The [`BufferPoolManager`] provides:
//! - Page caching between a page store and memory
//! - Pin-based reference counting
//! - Write-back of dirty pages on eviction, force and flush
//! - FIFO or LRU replacement, picked at creation

use log::{debug, trace, warn};

use crate::buffer::replacer::{ReplacementPolicy, ReplacementStrategy};
use crate::buffer::{BufferPoolStats, FrameTable, PageHandle, StatsSnapshot};
use crate::common::{Error, FrameId, PageId, Result, ShutdownPolicy};
use crate::storage::page::Page;
use crate::storage::{FilePageStore, PageStore};

/// Manages a fixed pool of frames caching pages of a [`PageStore`].
///
/// # Architecture
/// ```text
/// ┌─────────────────────────────────────────────────────────────┐
/// │                    BufferPoolManager                        │
/// │  ┌───────────────────────────────────────────────────────┐  │
/// │  │ FrameTable: residency PageId → FrameId, frames, free  │  │
/// │  └───────────────────────────────────────────────────────┘  │
/// │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐       │
/// │  │    policy    │  │    store     │  │    stats     │       │
/// │  │  FIFO | LRU  │  │  PageStore   │  │ reads/writes │       │
/// │  └──────────────┘  └──────────────┘  └──────────────┘       │
/// └─────────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// Single-threaded by contract: every mutating call takes `&mut self`. Wrap
/// the manager in a [`SharedBufferPool`](crate::SharedBufferPool) to share
/// it between threads behind one lock.
///
/// # Pin stability
/// A frame whose pin count is positive is never chosen as a victim, so its
/// page stays in place, bytes untouched, until the last unpin.
///
/// # Usage
/// ```
/// use pagepool::{BufferPoolManager, MemoryPageStore, PageId, ReplacementStrategy};
///
/// let mut bpm = BufferPoolManager::new(3, ReplacementStrategy::Lru, MemoryPageStore::new())?;
///
/// let handle = bpm.pin_page(PageId::new(0))?;
/// bpm.page_mut(&handle)?.as_mut_slice()[0] = 0xAB;
/// bpm.mark_dirty(PageId::new(0))?;
/// bpm.unpin_page(PageId::new(0))?;
///
/// bpm.force_flush_pool()?;
/// assert_eq!(bpm.num_write_io(), 1);
/// # Ok::<(), pagepool::Error>(())
/// ```
pub struct BufferPoolManager<S: PageStore = FilePageStore> {
    /// Frames plus the residency index over them.
    frames: FrameTable,

    /// Eviction policy for selecting victim frames.
    policy: Box<dyn ReplacementPolicy>,

    strategy: ReplacementStrategy,

    /// Handles all page I/O.
    store: S,

    stats: BufferPoolStats,

    shutdown_policy: ShutdownPolicy,

    /// Staging buffer for the incoming page during an eviction, so the victim
    /// keeps its bytes until the swap is certain to succeed.
    scratch: Box<Page>,
}

impl<S: PageStore> BufferPoolManager<S> {
    /// Create a buffer pool of `num_frames` empty frames over `store`.
    ///
    /// # Errors
    /// `Error::InvalidPoolSize` if `num_frames` is 0.
    pub fn new(num_frames: usize, strategy: ReplacementStrategy, store: S) -> Result<Self> {
        if num_frames == 0 {
            return Err(Error::InvalidPoolSize(num_frames));
        }

        debug!(
            "Buffer pool created: frames: {}, strategy: {}",
            num_frames, strategy
        );

        Ok(Self {
            frames: FrameTable::new(num_frames),
            policy: strategy.build(),
            strategy,
            store,
            stats: BufferPoolStats::new(),
            shutdown_policy: ShutdownPolicy::default(),
            scratch: Page::boxed(),
        })
    }

    /// Set what [`shutdown`](Self::shutdown) does with pages still pinned.
    pub fn set_shutdown_policy(&mut self, policy: ShutdownPolicy) {
        self.shutdown_policy = policy;
    }

    // ========================================================================
    // Public API: Pin and unpin
    // ========================================================================

    /// Pin `page_id`, loading it from the page store if it isn't resident.
    ///
    /// - Resident: the pin count goes up, no I/O.
    /// - Free frame available: the store is grown to hold the page if
    ///   needed, and the page is read into the frame.
    /// - Pool full: the policy picks an unpinned victim. The new page is
    ///   read into a staging buffer first, then a dirty victim is written
    ///   back, and only then is the frame swapped over. If either I/O fails
    ///   the victim keeps its page, pins and dirty flag.
    ///
    /// # Errors
    /// - `Error::InvalidPageId` for [`PageId::NO_PAGE`]
    /// - `Error::NoFreeFrame` if every frame is pinned
    /// - page store errors, unchanged
    pub fn pin_page(&mut self, page_id: PageId) -> Result<PageHandle> {
        if !page_id.is_valid() {
            return Err(Error::InvalidPageId(page_id));
        }

        // Fast path: page is already resident
        if let Some(frame_id) = self.frames.find_resident(page_id) {
            let frame = self.frames.frame_mut(frame_id);
            frame.pin();
            self.policy.on_reference(frame);
            self.stats.record_hit();
            trace!("Buffer pool hit: {} in {}", page_id, frame_id);
            return Ok(PageHandle::new(page_id, frame_id));
        }

        self.stats.record_miss();

        let frame_id = match self.frames.allocate_free_frame() {
            Some(frame_id) => {
                self.load_into_free_frame(frame_id, page_id)?;
                frame_id
            }
            None => self.evict_and_load(page_id)?,
        };

        Ok(PageHandle::new(page_id, frame_id))
    }

    /// Drop one pin on `page_id`. The page stays resident until evicted.
    ///
    /// # Errors
    /// - `Error::PageNotResident` if the page isn't in the pool
    /// - `Error::NotPinned` if its pin count is already 0
    pub fn unpin_page(&mut self, page_id: PageId) -> Result<()> {
        let frame_id = self.resident_frame(page_id)?;
        self.frames
            .frame_mut(frame_id)
            .unpin()
            .ok_or(Error::NotPinned(page_id))?;
        Ok(())
    }

    /// Record that the resident copy of `page_id` was modified.
    ///
    /// # Errors
    /// `Error::PageNotResident` if the page isn't in the pool.
    pub fn mark_dirty(&mut self, page_id: PageId) -> Result<()> {
        let frame_id = self.resident_frame(page_id)?;
        self.frames.frame_mut(frame_id).mark_dirty();
        Ok(())
    }

    // ========================================================================
    // Public API: Page access
    // ========================================================================

    /// Bytes of a pinned page.
    ///
    /// # Errors
    /// - `Error::PageNotResident` if the handle's frame no longer holds its page
    /// - `Error::NotPinned` if the page has been fully unpinned
    pub fn page(&self, handle: &PageHandle) -> Result<&Page> {
        let frame_id = self.pinned_frame(handle)?;
        Ok(self.frames.frame(frame_id).page())
    }

    /// Mutable bytes of a pinned page.
    ///
    /// Writing through this does not mark the page dirty; call
    /// [`mark_dirty`](Self::mark_dirty) for changes that must reach the store.
    ///
    /// # Errors
    /// Same as [`page`](Self::page).
    pub fn page_mut(&mut self, handle: &PageHandle) -> Result<&mut Page> {
        let frame_id = self.pinned_frame(handle)?;
        Ok(self.frames.frame_mut(frame_id).page_mut())
    }

    // ========================================================================
    // Public API: Write-back
    // ========================================================================

    /// Write `page_id` to the store now if it is dirty, pinned or not.
    ///
    /// A clean resident page is left alone.
    ///
    /// # Errors
    /// - `Error::PageNotResident` if the page isn't in the pool
    /// - page store errors, unchanged (the page stays dirty)
    pub fn force_page(&mut self, page_id: PageId) -> Result<()> {
        let frame_id = self.resident_frame(page_id)?;
        if self.frames.frame(frame_id).is_dirty() {
            self.write_back(frame_id)?;
        }
        Ok(())
    }

    /// Write back every dirty page that nobody has pinned.
    ///
    /// Pinned dirty pages are skipped: their holders may still be changing
    /// them. Such a page is durable only after an explicit
    /// [`force_page`](Self::force_page) or a later unpin and flush.
    ///
    /// # Errors
    /// Stops at the first page store error. Pages written before it stay
    /// written and clean.
    pub fn force_flush_pool(&mut self) -> Result<()> {
        let mut flushed = 0;
        for i in 0..self.frames.capacity() {
            let frame_id = FrameId::new(i);
            let frame = self.frames.frame(frame_id);
            if frame.is_dirty() && !frame.is_pinned() {
                self.write_back(frame_id)?;
                flushed += 1;
            }
        }

        debug!("Flushed {} dirty pages", flushed);
        Ok(())
    }

    /// Flush the pool and sync the store, ready to be dropped.
    ///
    /// With [`ShutdownPolicy::Strict`], pinned pages make shutdown fail and
    /// the pool stays usable. With [`ShutdownPolicy::FlushAndWarn`], pinned
    /// dirty pages are written too and a warning is logged.
    ///
    /// # Errors
    /// - `Error::BufferPoolInUse` (strict mode) if any page is still pinned
    /// - page store errors, unchanged
    pub fn shutdown(&mut self) -> Result<()> {
        self.force_flush_pool()?;

        let pinned: Vec<FrameId> = self
            .frames
            .frames()
            .iter()
            .filter(|frame| frame.is_pinned())
            .map(|frame| frame.frame_id())
            .collect();

        if !pinned.is_empty() {
            match self.shutdown_policy {
                ShutdownPolicy::Strict => {
                    return Err(Error::BufferPoolInUse {
                        pinned: pinned.len(),
                    })
                }
                ShutdownPolicy::FlushAndWarn => {
                    for &frame_id in &pinned {
                        if self.frames.frame(frame_id).is_dirty() {
                            self.write_back(frame_id)?;
                        }
                    }
                    let pages: Vec<PageId> = pinned
                        .iter()
                        .filter_map(|&frame_id| self.frames.frame(frame_id).page_id())
                        .collect();
                    warn!(
                        "Shutting down buffer pool with {} pinned page(s): {:?}",
                        pages.len(),
                        pages
                    );
                }
            }
        }

        self.store.sync()?;
        debug!("Buffer pool shut down: {}", self.stats.snapshot());
        Ok(())
    }

    // ========================================================================
    // Public API: Stats and info
    // ========================================================================

    /// Page held by each frame, in frame order; [`PageId::NO_PAGE`] for empty
    /// frames.
    pub fn frame_contents(&self) -> Vec<PageId> {
        self.frames
            .frames()
            .iter()
            .map(|frame| frame.page_id().unwrap_or(PageId::NO_PAGE))
            .collect()
    }

    /// Dirty flag of each frame, in frame order. Empty frames are clean.
    pub fn dirty_flags(&self) -> Vec<bool> {
        self.frames.frames().iter().map(|frame| frame.is_dirty()).collect()
    }

    /// Pin count of each frame, in frame order. Empty frames report 0.
    pub fn fix_counts(&self) -> Vec<u32> {
        self.frames.frames().iter().map(|frame| frame.pin_count()).collect()
    }

    /// Pages read from the store since the pool was created.
    pub fn num_read_io(&self) -> u64 {
        self.stats.pages_read()
    }

    /// Pages written to the store since the pool was created.
    pub fn num_write_io(&self) -> u64 {
        self.stats.pages_written()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn pool_size(&self) -> usize {
        self.frames.capacity()
    }

    pub fn free_frame_count(&self) -> usize {
        self.frames.capacity() - self.frames.occupied()
    }

    /// Number of resident pages.
    pub fn page_count(&self) -> usize {
        self.frames.occupied()
    }

    pub fn strategy(&self) -> ReplacementStrategy {
        self.strategy
    }

    /// Pin count of `page_id`, or `None` if it isn't resident.
    pub fn pin_count(&self, page_id: PageId) -> Option<u32> {
        self.frames
            .find_resident(page_id)
            .map(|frame_id| self.frames.frame(frame_id).pin_count())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the page store back, dropping every frame.
    ///
    /// Nothing is flushed; call [`shutdown`](Self::shutdown) first.
    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // Internal: lookups
    // ========================================================================

    fn resident_frame(&self, page_id: PageId) -> Result<FrameId> {
        self.frames
            .find_resident(page_id)
            .ok_or(Error::PageNotResident(page_id))
    }

    /// Check that `handle` still refers to a pinned, resident page.
    fn pinned_frame(&self, handle: &PageHandle) -> Result<FrameId> {
        let frame = self
            .frames
            .get(handle.frame_id())
            .filter(|frame| frame.page_id() == Some(handle.page_id()))
            .ok_or(Error::PageNotResident(handle.page_id()))?;

        if !frame.is_pinned() {
            return Err(Error::NotPinned(handle.page_id()));
        }
        Ok(frame.frame_id())
    }

    // ========================================================================
    // Internal: loading and eviction
    // ========================================================================

    /// Read `page_id` straight into an empty frame and bind it.
    fn load_into_free_frame(&mut self, frame_id: FrameId, page_id: PageId) -> Result<()> {
        self.store.ensure_capacity(page_id.required_blocks())?;
        self.store
            .read_page(page_id, self.frames.frame_mut(frame_id).page_mut())?;

        self.install(frame_id, page_id);
        debug!("Page loaded: {} into {}", page_id, frame_id);
        Ok(())
    }

    /// Replace the policy's victim with `page_id`. All-or-nothing.
    fn evict_and_load(&mut self, page_id: PageId) -> Result<FrameId> {
        let victim = self
            .policy
            .select_victim(self.frames.frames())
            .map_err(|e| match e {
                Error::NoVictimAvailable => Error::NoFreeFrame,
                other => other,
            })?;

        // Stage the incoming page; a failed read leaves the victim untouched
        self.store.ensure_capacity(page_id.required_blocks())?;
        self.store.read_page(page_id, &mut self.scratch)?;

        // The victim's bytes must be on disk before the frame is reused
        if self.frames.frame(victim).is_dirty() {
            self.write_back(victim)?;
        }

        let old_page_id = self.frames.unbind(victim);
        self.frames
            .frame_mut(victim)
            .page_mut()
            .copy_from(&self.scratch);
        self.install(victim, page_id);
        self.stats.record_eviction();

        debug!(
            "Page evicted: {:?} from {} for {}",
            old_page_id, victim, page_id
        );
        Ok(victim)
    }

    /// Bind a freshly loaded page: one pin, clean, stamped by the policy.
    fn install(&mut self, frame_id: FrameId, page_id: PageId) {
        self.frames.bind(frame_id, page_id);

        let frame = self.frames.frame_mut(frame_id);
        frame.pin();
        frame.clear_dirty();
        self.policy.on_load(frame);
        self.stats.record_read();
    }

    /// Write a frame's page to the store and mark it clean.
    fn write_back(&mut self, frame_id: FrameId) -> Result<()> {
        let frame = self.frames.frame(frame_id);
        let Some(page_id) = frame.page_id() else {
            return Ok(());
        };

        self.store.write_page(page_id, frame.page())?;
        self.frames.frame_mut(frame_id).clear_dirty();
        self.stats.record_write();
        trace!("Page written back: {} from {}", page_id, frame_id);
        Ok(())
    }
}
