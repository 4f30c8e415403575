//! Frame table and residency index.

use std::collections::{BTreeSet, HashMap};

use crate::buffer::Frame;
use crate::common::{FrameId, PageId};

/// The pool's fixed frame array plus the page → frame index over it.
///
/// ```text
/// ┌──────────────┐     ┌───────────────────────────────────┐
/// │  residency   │     │        frames: Vec<Frame>         │
/// │ PageId → Fid │────▶│  [Frame0] [Frame1] [Frame2] ...   │
/// └──────────────┘     └───────────────────────────────────┘
/// ┌──────────────┐
/// │     free     │  empty frames, lowest index handed out first
/// └──────────────┘
/// ```
///
/// `bind` and `unbind` are the only ways a frame's page changes, and each
/// updates the frame, the residency index and the free set together, so the
/// residency map is always exactly the set of occupied frames.
#[derive(Debug)]
pub struct FrameTable {
    frames: Vec<Frame>,
    residency: HashMap<PageId, FrameId>,
    free: BTreeSet<FrameId>,
}

impl FrameTable {
    /// Allocate `capacity` empty frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: (0..capacity).map(|i| Frame::new(FrameId::new(i))).collect(),
            residency: HashMap::with_capacity(capacity),
            free: (0..capacity).map(FrameId::new).collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames holding a page.
    #[inline]
    pub fn occupied(&self) -> usize {
        self.residency.len()
    }

    /// Frame holding `page_id`, if resident.
    #[inline]
    pub fn find_resident(&self, page_id: PageId) -> Option<FrameId> {
        self.residency.get(&page_id).copied()
    }

    /// An empty frame, if there is one. The frame stays free until bound.
    #[inline]
    pub fn allocate_free_frame(&self) -> Option<FrameId> {
        self.free.first().copied()
    }

    /// Load `page_id` into the empty frame `frame_id`.
    ///
    /// # Panics
    /// Panics if the frame is occupied or the page is already resident
    /// elsewhere; either would break the residency bijection.
    pub fn bind(&mut self, frame_id: FrameId, page_id: PageId) {
        let frame = &mut self.frames[frame_id.0];
        assert!(frame.is_empty(), "bind into occupied {}", frame_id);
        assert!(
            !self.residency.contains_key(&page_id),
            "{} is already resident",
            page_id
        );

        frame.set_page_id(Some(page_id));
        self.residency.insert(page_id, frame_id);
        self.free.remove(&frame_id);
    }

    /// Release `frame_id`, returning the page it held.
    ///
    /// Metadata is reset; pin and dirty state are the caller's concern.
    pub fn unbind(&mut self, frame_id: FrameId) -> Option<PageId> {
        let frame = &mut self.frames[frame_id.0];
        let page_id = frame.page_id()?;

        frame.reset();
        self.residency.remove(&page_id);
        self.free.insert(frame_id);
        Some(page_id)
    }

    #[inline]
    pub fn frame(&self, frame_id: FrameId) -> &Frame {
        &self.frames[frame_id.0]
    }

    #[inline]
    pub fn frame_mut(&mut self, frame_id: FrameId) -> &mut Frame {
        &mut self.frames[frame_id.0]
    }

    /// Frame by id, or `None` if the id is out of range.
    #[inline]
    pub fn get(&self, frame_id: FrameId) -> Option<&Frame> {
        self.frames.get(frame_id.0)
    }

    #[inline]
    pub fn get_mut(&mut self, frame_id: FrameId) -> Option<&mut Frame> {
        self.frames.get_mut(frame_id.0)
    }

    /// All frames in frame-index order.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}
