//! Buffer pool statistics tracking.

use std::fmt;

/// Counters kept by the buffer pool since it was created.
///
/// `pages_read` and `pages_written` count page store I/O and back
/// [`num_read_io`](crate::BufferPoolManager::num_read_io) and
/// [`num_write_io`](crate::BufferPoolManager::num_write_io). They only move
/// forward and only count I/O that took effect.
#[derive(Debug, Default)]
pub struct BufferPoolStats {
    /// Pins served from a resident frame.
    cache_hits: u64,

    /// Pins that needed a page load.
    cache_misses: u64,

    /// Resident pages dropped to make room for another page.
    evictions: u64,

    /// Pages read from the page store.
    pages_read: u64,

    /// Pages written to the page store.
    pages_written: u64,
}

impl BufferPoolStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    #[inline]
    pub(crate) fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    #[inline]
    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    #[inline]
    pub(crate) fn record_read(&mut self) {
        self.pages_read += 1;
    }

    #[inline]
    pub(crate) fn record_write(&mut self) {
        self.pages_written += 1;
    }

    #[inline]
    pub fn pages_read(&self) -> u64 {
        self.pages_read
    }

    #[inline]
    pub fn pages_written(&self) -> u64 {
        self.pages_written
    }

    /// Get a copy of the current counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            evictions: self.evictions,
            pages_read: self.pages_read,
            pages_written: self.pages_written,
        }
    }
}

/// A point-in-time copy of buffer pool statistics.
///
/// # Example
/// ```
/// use pagepool::BufferPoolStats;
///
/// let stats = BufferPoolStats::new();
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.pages_read, 0);
/// println!("{}", snapshot);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub evictions: u64,
    pub pages_read: u64,
    pub pages_written: u64,
}

impl StatsSnapshot {
    /// Calculate cache hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ hits: {}, misses: {}, evictions: {}, reads: {}, writes: {}, hit_rate: {:.2}% }}",
            self.cache_hits,
            self.cache_misses,
            self.evictions,
            self.pages_read,
            self.pages_written,
            self.hit_rate() * 100.0
        )
    }
}
