//! Replacement policies (replacers).
//!
//! - [`FifoReplacer`] - evicts the page loaded earliest
//! - [`LruReplacer`] - evicts the page used least recently
//!
//! A policy only orders frames; the pool owns the frames and decides when to
//! ask. It never asks while an empty frame exists.

mod fifo;
mod lru;

use std::fmt;
use std::str::FromStr;

use crate::buffer::Frame;
use crate::common::{Error, FrameId, Result};

pub use fifo::FifoReplacer;
pub use lru::LruReplacer;

/// A strategy for choosing which unpinned frame to evict.
///
/// Policies stamp sequence numbers onto frames as pages are loaded and
/// referenced, then pick a victim by scanning those stamps.
pub trait ReplacementPolicy: Send + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// A page was just loaded into `frame`. Called once per load.
    fn on_load(&mut self, frame: &mut Frame);

    /// A resident page in `frame` was pinned again.
    fn on_reference(&mut self, frame: &mut Frame);

    /// Pick the frame to evict among resident frames with no pins.
    ///
    /// # Errors
    /// `Error::NoVictimAvailable` if every resident frame is pinned.
    fn select_victim(&self, frames: &[Frame]) -> Result<FrameId>;
}

/// Which replacement policy a pool uses. Chosen once at pool creation.
///
/// # Example
/// ```
/// use pagepool::ReplacementStrategy;
///
/// let strategy: ReplacementStrategy = "LRU".parse().unwrap();
/// assert_eq!(strategy, ReplacementStrategy::Lru);
/// assert_eq!(strategy.build().name(), "LRU");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplacementStrategy {
    #[default]
    Fifo,
    Lru,
}

impl ReplacementStrategy {
    /// Instantiate the policy.
    pub fn build(self) -> Box<dyn ReplacementPolicy> {
        match self {
            ReplacementStrategy::Fifo => Box::new(FifoReplacer::new()),
            ReplacementStrategy::Lru => Box::new(LruReplacer::new()),
        }
    }
}

impl fmt::Display for ReplacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementStrategy::Fifo => write!(f, "FIFO"),
            ReplacementStrategy::Lru => write!(f, "LRU"),
        }
    }
}

impl FromStr for ReplacementStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(ReplacementStrategy::Fifo),
            "lru" => Ok(ReplacementStrategy::Lru),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// Evictable frame with the smallest `key`, ties going to the lowest index.
fn min_evictable_by<F>(frames: &[Frame], key: F) -> Result<FrameId>
where
    F: Fn(&Frame) -> u64,
{
    frames
        .iter()
        .filter(|frame| frame.is_evictable())
        .min_by_key(|&frame| (key(frame), frame.frame_id()))
        .map(Frame::frame_id)
        .ok_or(Error::NoVictimAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy() {
        assert_eq!("fifo".parse::<ReplacementStrategy>().unwrap(), ReplacementStrategy::Fifo);
        assert_eq!(" Lru ".parse::<ReplacementStrategy>().unwrap(), ReplacementStrategy::Lru);
        assert!(matches!(
            "clock".parse::<ReplacementStrategy>(),
            Err(Error::UnknownStrategy(s)) if s == "clock"
        ));
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for strategy in [ReplacementStrategy::Fifo, ReplacementStrategy::Lru] {
            assert_eq!(strategy.to_string().parse::<ReplacementStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_build_names() {
        assert_eq!(ReplacementStrategy::Fifo.build().name(), "FIFO");
        assert_eq!(ReplacementStrategy::Lru.build().name(), "LRU");
    }
}
