//! Error types for the buffer pool and page store.

use std::path::PathBuf;

use thiserror::Error;

use crate::common::PageId;

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by the pool and the page store.
///
/// Initialization errors (`AlreadyInitialized`, `NotInitialized`,
/// `FileNotFound`, `InvalidPoolSize`, `UnknownStrategy`, `CorruptPageFile`)
/// need outside remediation. Caller-correctness errors (`PageNotResident`,
/// `NotPinned`, `NoFreeFrame`, `BufferPoolInUse`, `InvalidPageId`) mean the
/// pin/unpin contract was broken. I/O errors come from the page store and are
/// passed through untouched.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page file {} not found", .0.display())]
    FileNotFound(PathBuf),

    #[error("page file is corrupt: {0}")]
    CorruptPageFile(String),

    #[error("cannot read {0}: beyond end of page file")]
    ReadNonExistingPage(PageId),

    #[error("cannot write {0}: beyond end of page file")]
    WriteFailed(PageId),

    #[error("buffer pool is already initialized")]
    AlreadyInitialized,

    #[error("buffer pool is not initialized")]
    NotInitialized,

    #[error("invalid pool size {0}: need at least one frame")]
    InvalidPoolSize(usize),

    #[error("unknown replacement strategy {0:?}")]
    UnknownStrategy(String),

    #[error("invalid page id: {0}")]
    InvalidPageId(PageId),

    #[error("{0} is not resident in the buffer pool")]
    PageNotResident(PageId),

    #[error("{0} is not pinned")]
    NotPinned(PageId),

    /// Every frame is pinned; raised by the pool when a miss cannot be served.
    #[error("no free frame available in buffer pool")]
    NoFreeFrame,

    /// Raised by a replacement policy when every resident frame is pinned.
    #[error("no unpinned frame available for eviction")]
    NoVictimAvailable,

    #[error("buffer pool still has {pinned} pinned page(s)")]
    BufferPoolInUse { pinned: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotResident(PageId::new(42));
        assert_eq!(format!("{}", err), "Page(42) is not resident in the buffer pool");

        let err = Error::NoFreeFrame;
        assert_eq!(format!("{}", err), "no free frame available in buffer pool");

        let err = Error::BufferPoolInUse { pinned: 2 };
        assert_eq!(format!("{}", err), "buffer pool still has 2 pinned page(s)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_source() {
        use std::error::Error as _;

        let err: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into();
        assert!(err.source().is_some());
        assert!(Error::NoFreeFrame.source().is_none());
    }
}
