//! Page identifier type.

use std::fmt;

/// Identifies a page (block) in the page store.
///
/// Page numbers start at 0 and address data blocks only; the page file's
/// header block is not addressable.
///
/// # Example
/// ```
/// use pagepool::PageId;
///
/// let page_id = PageId::new(42);
/// assert!(page_id.is_valid());
/// assert_eq!(page_id.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Sentinel for "no page".
    ///
    /// Reported by [`frame_contents`](crate::BufferPoolManager::frame_contents)
    /// for empty frames; never a valid argument to `pin_page`.
    pub const NO_PAGE: PageId = PageId(u32::MAX);

    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Check if this page ID is valid (not the sentinel value).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NO_PAGE
    }

    /// Number of blocks the store needs for this page to exist.
    #[inline]
    pub(crate) fn required_blocks(&self) -> u32 {
        self.0 + 1
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NO_PAGE {
            write!(f, "Page(NONE)")
        } else {
            write!(f, "Page({})", self.0)
        }
    }
}
