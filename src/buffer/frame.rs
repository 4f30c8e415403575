//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] holds a [`Page`] plus the metadata needed for buffer
//! management:
//! - Which page is loaded (if any)
//! - Pin count for reference counting
//! - Dirty flag for write-back tracking
//! - Load and last-use sequence numbers for the replacement policy

use crate::common::{FrameId, PageId};
use crate::storage::page::Page;

/// A frame in the buffer pool.
///
/// The pool owns a fixed array of frames allocated at startup. Frames are
/// plain data: the pool hands out `&mut` access only through its own
/// `&mut self` methods, so no interior locking is needed.
///
/// # Invariants
/// - an empty frame (`page_id == None`) has `pin_count == 0` and is clean
/// - a dirty frame always holds a page
#[derive(Debug)]
pub struct Frame {
    frame_id: FrameId,

    /// Which page is currently loaded, or None if frame is empty.
    page_id: Option<PageId>,

    data: Box<Page>,

    /// Number of outstanding pins.
    pin_count: u32,

    /// Whether the bytes differ from what the page store holds.
    is_dirty: bool,

    /// Policy clock value when the current page was loaded.
    arrival_seq: u64,

    /// Policy clock value of the most recent use.
    last_use_seq: u64,
}

impl Frame {
    /// Create a new empty frame.
    pub fn new(frame_id: FrameId) -> Self {
        Self {
            frame_id,
            page_id: None,
            data: Page::boxed(),
            pin_count: 0,
            is_dirty: false,
            arrival_seq: 0,
            last_use_seq: 0,
        }
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    // ========================================================================
    // Page data
    // ========================================================================

    #[inline]
    pub fn page(&self) -> &Page {
        &self.data
    }

    #[inline]
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.data
    }

    // ========================================================================
    // Binding
    // ========================================================================

    /// Get the page ID of the loaded page.
    #[inline]
    pub fn page_id(&self) -> Option<PageId> {
        self.page_id
    }

    /// Bind or release the frame. Only the frame table calls this, keeping
    /// frame and residency index in step.
    #[inline]
    pub(crate) fn set_page_id(&mut self, page_id: Option<PageId>) {
        self.page_id = page_id;
    }

    // ========================================================================
    // Pin count
    // ========================================================================

    /// Increment the pin count. Returns the new pin count.
    #[inline]
    pub fn pin(&mut self) -> u32 {
        self.pin_count += 1;
        self.pin_count
    }

    /// Decrement the pin count. Returns the new pin count, or `None` if the
    /// frame was not pinned (the count is left at zero).
    #[inline]
    pub fn unpin(&mut self) -> Option<u32> {
        self.pin_count = self.pin_count.checked_sub(1)?;
        Some(self.pin_count)
    }

    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    // ========================================================================
    // Dirty flag
    // ========================================================================

    /// Mark the frame as dirty (modified).
    #[inline]
    pub fn mark_dirty(&mut self) {
        debug_assert!(self.page_id.is_some(), "empty frame marked dirty");
        self.is_dirty = true;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.is_dirty = false;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    // ========================================================================
    // Replacement bookkeeping
    // ========================================================================

    #[inline]
    pub fn arrival_seq(&self) -> u64 {
        self.arrival_seq
    }

    #[inline]
    pub fn set_arrival_seq(&mut self, seq: u64) {
        self.arrival_seq = seq;
    }

    #[inline]
    pub fn last_use_seq(&self) -> u64 {
        self.last_use_seq
    }

    #[inline]
    pub fn set_last_use_seq(&mut self, seq: u64) {
        self.last_use_seq = seq;
    }

    // ========================================================================
    // Frame state queries
    // ========================================================================

    /// Check if the frame is empty (no page loaded).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.page_id.is_none()
    }

    /// A frame can be evicted when it holds a page nobody has pinned.
    #[inline]
    pub fn is_evictable(&self) -> bool {
        self.page_id.is_some() && !self.is_pinned()
    }

    /// Clear all metadata, leaving the page bytes in place.
    ///
    /// The bytes are overwritten by the next load, so zeroing them here would
    /// only cost a 4KB fill per eviction.
    pub(crate) fn reset(&mut self) {
        self.page_id = None;
        self.pin_count = 0;
        self.is_dirty = false;
        self.arrival_seq = 0;
        self.last_use_seq = 0;
    }
}
