//! FIFO (First-In-First-Out) replacement policy.

use crate::buffer::Frame;
use crate::common::{FrameId, Result};

use super::{min_evictable_by, ReplacementPolicy};

/// Evicts pages in the order they were loaded.
///
/// Re-pinning a resident page does not move it: a page loaded first is
/// evicted first no matter how often it has been used since. Pinned pages
/// are skipped.
#[derive(Debug, Default)]
pub struct FifoReplacer {
    /// Monotonic load counter.
    clock: u64,
}

impl FifoReplacer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementPolicy for FifoReplacer {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn on_load(&mut self, frame: &mut Frame) {
        self.clock += 1;
        frame.set_arrival_seq(self.clock);
        frame.set_last_use_seq(self.clock);
    }

    fn on_reference(&mut self, _frame: &mut Frame) {}

    fn select_victim(&self, frames: &[Frame]) -> Result<FrameId> {
        min_evictable_by(frames, Frame::arrival_seq)
    }
}
