//! Page - the fixed-size unit of storage and caching.

use crate::common::config::PAGE_SIZE;

/// A block of `PAGE_SIZE` bytes, 4KB-aligned.
///
/// This is what the page store reads and writes and what each buffer frame
/// holds. The pool has no opinion on its contents.
///
/// `Page` is not `Clone` outside tests; copying a block should be spelled out
/// with [`Page::copy_from`].
///
/// # Example
/// ```
/// use pagepool::Page;
///
/// let mut page = Page::new();
/// page.as_mut_slice()[0] = 0xFF;
/// assert_eq!(page.as_slice()[0], 0xFF);
/// ```
#[repr(align(4096))]
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    /// Create a new zeroed page.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }

    /// Allocate a zeroed page on the heap.
    pub fn boxed() -> Box<Self> {
        Box::new(Self::new())
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite this page with the bytes of `other`.
    #[inline]
    pub fn copy_from(&mut self, other: &Page) {
        self.data.copy_from_slice(&other.data);
    }

    /// Zero out the entire page.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    #[inline]
    pub const fn size() -> usize {
        PAGE_SIZE
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let used = self.data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        f.debug_struct("Page").field("used_bytes", &used).finish()
    }
}

#[cfg(test)]
impl Clone for Page {
    fn clone(&self) -> Self {
        let mut new_page = Page::new();
        new_page.copy_from(self);
        new_page
    }
}
