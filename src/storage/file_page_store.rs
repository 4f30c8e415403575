//! File-backed page store.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::common::config::{FILE_HEADER_SIZE, PAGE_SIZE};
use crate::common::{Error, PageId, Result};
use crate::storage::file_header::FileHeader;
use crate::storage::page::Page;
use crate::storage::PageStore;

/// A page store kept in a single file.
///
/// # File Layout
/// ```text
/// ┌──────────┬─────────┬─────────┬─────────┬─────────┐
/// │  Header  │ Page 0  │ Page 1  │  ...    │ Page N  │
/// │  (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └──────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset: 0     4096      8192     ...    (N+1)×4096
/// ```
///
/// Page N is located at file offset `(N + 1) × PAGE_SIZE`. The header block
/// records the block count and is rewritten whenever the file grows.
///
/// # Durability
/// Every page write and every grow is followed by `sync_data()`.
pub struct FilePageStore {
    file: File,
    path: PathBuf,
    block_count: u32,
}

impl FilePageStore {
    /// Create a new page file holding one zeroed page.
    ///
    /// # Errors
    /// Returns an I/O error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        let mut store = Self {
            file,
            path: path.as_ref().to_path_buf(),
            block_count: 0,
        };
        store.ensure_capacity(1)?;

        debug!("Created page file {:?}", store.path);
        Ok(store)
    }

    /// Open an existing page file.
    ///
    /// # Errors
    /// - `Error::FileNotFound` if the file doesn't exist
    /// - `Error::CorruptPageFile` if the header is unreadable or disagrees
    ///   with the file length
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::FileNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut header = [0u8; FileHeader::SIZE];
        file.read_exact(&mut header).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::CorruptPageFile("missing header block".to_string()),
            _ => Error::Io(e),
        })?;
        let header = FileHeader::from_bytes(&header)?;

        let expected_len = Self::offset_of(header.block_count);
        let actual_len = file.metadata()?.len();
        if actual_len < expected_len {
            return Err(Error::CorruptPageFile(format!(
                "header records {} blocks but file is {} bytes",
                header.block_count, actual_len
            )));
        }

        debug!(
            "Opened page file {:?} with {} blocks",
            path, header.block_count
        );
        Ok(Self {
            file,
            path: path.to_path_buf(),
            block_count: header.block_count,
        })
    }

    /// Sync and release the file handle.
    pub fn close(mut self) -> Result<()> {
        self.sync()?;
        debug!("Closed page file {:?}", self.path);
        Ok(())
    }

    /// Delete a page file.
    ///
    /// # Errors
    /// `Error::FileNotFound` if there is nothing to delete.
    pub fn destroy<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Ok(()) => {
                debug!("Destroyed page file {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(Error::FileNotFound(path.to_path_buf()))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size of the file in bytes, header included.
    #[inline]
    pub fn file_size(&self) -> u64 {
        Self::offset_of(self.block_count)
    }

    /// Byte offset of data block `block`.
    #[inline]
    fn offset_of(block: u32) -> u64 {
        FILE_HEADER_SIZE as u64 + (block as u64) * (PAGE_SIZE as u64)
    }

    fn write_header(&mut self) -> Result<()> {
        let mut block = Page::boxed();
        FileHeader::new(self.block_count).write_to(block.as_mut_slice());
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&block.as_slice()[..FILE_HEADER_SIZE])?;
        Ok(())
    }
}

impl PageStore for FilePageStore {
    fn read_page(&mut self, page_id: PageId, page: &mut Page) -> Result<()> {
        if page_id.0 >= self.block_count {
            return Err(Error::ReadNonExistingPage(page_id));
        }

        trace!("Reading {} from {:?}", page_id, self.path);
        self.file.seek(SeekFrom::Start(Self::offset_of(page_id.0)))?;
        self.file.read_exact(page.as_mut_slice())?;
        Ok(())
    }

    fn write_page(&mut self, page_id: PageId, page: &Page) -> Result<()> {
        if page_id.0 >= self.block_count {
            return Err(Error::WriteFailed(page_id));
        }

        trace!("Writing {} to {:?}", page_id, self.path);
        self.file.seek(SeekFrom::Start(Self::offset_of(page_id.0)))?;
        self.file.write_all(page.as_slice())?;
        self.file.sync_data()?;
        Ok(())
    }

    fn ensure_capacity(&mut self, block_count: u32) -> Result<()> {
        if block_count <= self.block_count {
            return Ok(());
        }

        // Extend with zeroed blocks, then publish the new count in the header
        let zeros = Page::boxed();
        self.file
            .seek(SeekFrom::Start(Self::offset_of(self.block_count)))?;
        for _ in self.block_count..block_count {
            self.file.write_all(zeros.as_slice())?;
        }

        let old = self.block_count;
        self.block_count = block_count;
        if let Err(e) = self.write_header() {
            self.block_count = old;
            return Err(e);
        }
        self.file.sync_data()?;

        debug!(
            "Grew page file {:?} from {} to {} blocks",
            self.path, old, block_count
        );
        Ok(())
    }

    #[inline]
    fn block_count(&self) -> u32 {
        self.block_count
    }

    fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_new_page_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pages");

        let store = FilePageStore::create(&path).unwrap();
        assert_eq!(store.block_count(), 1);
        assert_eq!(store.file_size(), 2 * PAGE_SIZE as u64);
        assert_eq!(fs::metadata(&path).unwrap().len(), 2 * PAGE_SIZE as u64);
    }

    #[test]
    fn test_create_existing_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pages");

        FilePageStore::create(&path).unwrap();
        assert!(matches!(FilePageStore::create(&path), Err(Error::Io(_))));
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.pages");

        assert!(matches!(
            FilePageStore::open(&path),
            Err(Error::FileNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_open_garbage_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.pages");
        fs::write(&path, b"not a page file").unwrap();

        assert!(matches!(
            FilePageStore::open(&path),
            Err(Error::CorruptPageFile(_))
        ));
    }

    #[test]
    fn test_open_truncated_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pages");
        {
            let mut store = FilePageStore::create(&path).unwrap();
            store.ensure_capacity(4).unwrap();
        }

        let file = OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(2 * PAGE_SIZE as u64).unwrap();
        drop(file);

        assert!(matches!(
            FilePageStore::open(&path),
            Err(Error::CorruptPageFile(_))
        ));
    }

    #[test]
    fn test_new_page_is_zeroed() {
        let dir = tempdir().unwrap();
        let mut store = FilePageStore::create(dir.path().join("test.pages")).unwrap();

        let mut page = Page::new();
        page.as_mut_slice()[0] = 0xEE;
        store.read_page(PageId::new(0), &mut page).unwrap();
        assert!(page.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_write_and_read_page() {
        let dir = tempdir().unwrap();
        let mut store = FilePageStore::create(dir.path().join("test.pages")).unwrap();

        let mut page = Page::new();
        page.as_mut_slice()[0] = 0xAB;
        page.as_mut_slice()[4095] = 0xEF;
        store.write_page(PageId::new(0), &page).unwrap();

        let mut read_back = Page::new();
        store.read_page(PageId::new(0), &mut read_back).unwrap();
        assert_eq!(read_back.as_slice()[0], 0xAB);
        assert_eq!(read_back.as_slice()[4095], 0xEF);
    }

    #[test]
    fn test_ensure_capacity_grows_and_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pages");

        {
            let mut store = FilePageStore::create(&path).unwrap();
            store.ensure_capacity(5).unwrap();
            assert_eq!(store.block_count(), 5);

            // Smaller request is a no-op
            store.ensure_capacity(2).unwrap();
            assert_eq!(store.block_count(), 5);

            let mut page = Page::new();
            page.as_mut_slice()[0] = 0x42;
            store.write_page(PageId::new(4), &page).unwrap();
            store.close().unwrap();
        }

        let mut store = FilePageStore::open(&path).unwrap();
        assert_eq!(store.block_count(), 5);

        let mut page = Page::new();
        store.read_page(PageId::new(4), &mut page).unwrap();
        assert_eq!(page.as_slice()[0], 0x42);
    }

    #[test]
    fn test_read_beyond_end_fails() {
        let dir = tempdir().unwrap();
        let mut store = FilePageStore::create(dir.path().join("test.pages")).unwrap();

        let mut page = Page::new();
        assert!(matches!(
            store.read_page(PageId::new(1), &mut page),
            Err(Error::ReadNonExistingPage(pid)) if pid == PageId::new(1)
        ));
    }

    #[test]
    fn test_write_beyond_end_fails() {
        let dir = tempdir().unwrap();
        let mut store = FilePageStore::create(dir.path().join("test.pages")).unwrap();

        let page = Page::new();
        assert!(matches!(
            store.write_page(PageId::new(3), &page),
            Err(Error::WriteFailed(pid)) if pid == PageId::new(3)
        ));
    }

    #[test]
    fn test_destroy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.pages");

        FilePageStore::create(&path).unwrap().close().unwrap();
        FilePageStore::destroy(&path).unwrap();

        assert!(!path.exists());
        assert!(matches!(
            FilePageStore::open(&path),
            Err(Error::FileNotFound(_))
        ));
        assert!(matches!(
            FilePageStore::destroy(&path),
            Err(Error::FileNotFound(_))
        ));
    }
}
