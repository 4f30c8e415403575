//! Frame identifier type.

use std::fmt;

/// Index of a frame in the buffer pool's frame table.
///
/// Frames live in a fixed `Vec<Frame>`, so the id is the slot index:
/// `frames[frame_id.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub usize);

impl FrameId {
    #[inline]
    pub fn new(id: usize) -> Self {
        FrameId(id)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({})", self.0)
    }
}
