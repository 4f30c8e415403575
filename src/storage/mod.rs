//! Storage layer - the page store the buffer pool reads from and writes to.
//!
//! - [`PageStore`] - The fixed-block storage contract
//! - [`FilePageStore`] - A page file on disk with a header block
//! - [`MemoryPageStore`] - The same contract in memory
//! - [`page`] - The raw page type

mod file_header;
mod file_page_store;
mod memory_page_store;
pub mod page;
mod page_store;

pub use file_header::FileHeader;
pub use file_page_store::FilePageStore;
pub use memory_page_store::MemoryPageStore;
pub use page_store::PageStore;
