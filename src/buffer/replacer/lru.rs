//! LRU (Least Recently Used) replacement policy.

use crate::buffer::Frame;
use crate::common::{FrameId, Result};

use super::{min_evictable_by, ReplacementPolicy};

/// Evicts the unpinned page whose last pin is oldest.
///
/// A load counts as a use, and every later pin of the resident page
/// refreshes it.
#[derive(Debug, Default)]
pub struct LruReplacer {
    /// Monotonic use counter.
    clock: u64,
}

impl LruReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

impl ReplacementPolicy for LruReplacer {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn on_load(&mut self, frame: &mut Frame) {
        let now = self.tick();
        frame.set_arrival_seq(now);
        frame.set_last_use_seq(now);
    }

    fn on_reference(&mut self, frame: &mut Frame) {
        let now = self.tick();
        frame.set_last_use_seq(now);
    }

    fn select_victim(&self, frames: &[Frame]) -> Result<FrameId> {
        min_evictable_by(frames, Frame::last_use_seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::FrameTable;
    use crate::common::{Error, PageId};

    fn loaded_table(replacer: &mut LruReplacer, n: usize) -> FrameTable {
        let mut table = FrameTable::new(n);
        for i in 0..n {
            let fid = FrameId::new(i);
            table.bind(fid, PageId::new(i as u32));
            replacer.on_load(table.frame_mut(fid));
        }
        table
    }

    #[test]
    fn test_lru_without_references_matches_load_order() {
        let mut replacer = LruReplacer::new();
        let table = loaded_table(&mut replacer, 3);

        assert_eq!(replacer.select_victim(table.frames()).unwrap(), FrameId::new(0));
    }

    #[test]
    fn test_lru_reference_refreshes() {
        let mut replacer = LruReplacer::new();
        let mut table = loaded_table(&mut replacer, 3);

        replacer.on_reference(table.frame_mut(FrameId::new(0)));
        assert_eq!(replacer.select_victim(table.frames()).unwrap(), FrameId::new(1));

        replacer.on_reference(table.frame_mut(FrameId::new(1)));
        assert_eq!(replacer.select_victim(table.frames()).unwrap(), FrameId::new(2));
    }

    #[test]
    fn test_lru_skips_pinned() {
        let mut replacer = LruReplacer::new();
        let mut table = loaded_table(&mut replacer, 3);

        table.frame_mut(FrameId::new(0)).pin();
        assert_eq!(replacer.select_victim(table.frames()).unwrap(), FrameId::new(1));
    }

    #[test]
    fn test_lru_ties_go_to_lowest_frame() {
        let replacer = LruReplacer::new();
        let mut table = FrameTable::new(3);
        for i in [2, 1] {
            table.bind(FrameId::new(i), PageId::new(i as u32));
        }

        // Both frames carry last_use_seq 0
        assert_eq!(replacer.select_victim(table.frames()).unwrap(), FrameId::new(1));
    }

    #[test]
    fn test_lru_all_pinned() {
        let mut replacer = LruReplacer::new();
        let mut table = loaded_table(&mut replacer, 1);
        table.frame_mut(FrameId::new(0)).pin();

        assert!(matches!(
            replacer.select_victim(table.frames()),
            Err(Error::NoVictimAvailable)
        ));
    }
}
