//! Handles to pinned pages.

use crate::common::{FrameId, PageId};

/// Proof of a successful [`pin_page`](crate::BufferPoolManager::pin_page).
///
/// A handle names the page and the frame it was loaded into. It grants
/// access to the page bytes through
/// [`page`](crate::BufferPoolManager::page) and
/// [`page_mut`](crate::BufferPoolManager::page_mut) only while the page stays
/// pinned; the pool rechecks that on every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageHandle {
    page_id: PageId,
    frame_id: FrameId,
}

impl PageHandle {
    pub(crate) fn new(page_id: PageId, frame_id: FrameId) -> Self {
        Self { page_id, frame_id }
    }

    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }
}
