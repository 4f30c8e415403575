//! In-memory page store.

use log::trace;

use crate::common::{Error, PageId, Result};
use crate::storage::page::Page;
use crate::storage::PageStore;

/// A page store backed by a `Vec` of boxed pages.
///
/// Same contract as [`FilePageStore`](crate::storage::FilePageStore) without
/// touching disk. Useful for tests, benchmarks and scratch pools.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    blocks: Vec<Box<Page>>,
}

impl MemoryPageStore {
    /// An empty store (zero blocks).
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-grown to `block_count` zeroed blocks.
    pub fn with_blocks(block_count: u32) -> Self {
        let mut store = Self::new();
        store.grow_to(block_count);
        store
    }

    fn grow_to(&mut self, block_count: u32) {
        while self.blocks.len() < block_count as usize {
            self.blocks.push(Page::boxed());
        }
    }
}

impl PageStore for MemoryPageStore {
    fn read_page(&mut self, page_id: PageId, page: &mut Page) -> Result<()> {
        let block = self
            .blocks
            .get(page_id.0 as usize)
            .ok_or(Error::ReadNonExistingPage(page_id))?;
        trace!("Reading {} from memory", page_id);
        page.copy_from(block);
        Ok(())
    }

    fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        let block = self
            .blocks
            .get_mut(page_id.0 as usize)
            .ok_or(Error::WriteFailed(page_id))?;
        trace!("Writing {} to memory", page_id);
        block.copy_from(page);
        Ok(())
    }

    fn ensure_capacity(&mut self, block_count: u32) -> Result<()> {
        self.grow_to(block_count);
        Ok(())
    }

    fn block_count(&self) -> u32 {
        self.blocks.len() as u32
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let mut store = MemoryPageStore::new();
        assert_eq!(store.block_count(), 0);

        let mut page = Page::new();
        assert!(matches!(
            store.read_page(PageId::new(0), &mut page),
            Err(Error::ReadNonExistingPage(_))
        ));
        assert!(matches!(
            store.write_page(PageId::new(0), &page),
            Err(Error::WriteFailed(_))
        ));
    }

    #[test]
    fn test_write_read_after_grow() {
        let mut store = MemoryPageStore::with_blocks(1);
        store.ensure_capacity(3).unwrap();
        assert_eq!(store.block_count(), 3);

        let mut page = Page::new();
        page.as_mut_slice()[10] = 0x5A;
        store.write_page(PageId::new(2), &page).unwrap();

        let mut read_back = Page::new();
        store.read_page(PageId::new(2), &mut read_back).unwrap();
        assert_eq!(read_back.as_slice()[10], 0x5A);
    }

    #[test]
    fn test_ensure_capacity_never_shrinks() {
        let mut store = MemoryPageStore::with_blocks(4);
        store.ensure_capacity(1).unwrap();
        assert_eq!(store.block_count(), 4);
    }
}
