//! Page file header.
//!
//! The first block of every page file is reserved for a [`FileHeader`]
//! recording the number of data blocks. It is read when the file is opened
//! and rewritten whenever the file grows.

use crate::common::{Error, Result};

/// Metadata stored at the beginning of every page file.
///
/// # Layout (20 bytes, rest of the header block is zero)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       8     magic (b"PGPOOL\0\0")
/// 8       4     version (little-endian)
/// 12      4     block_count (little-endian)
/// 16      4     checksum (CRC32 of bytes 0..16, little-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    /// Number of data blocks in the file (header block excluded).
    pub block_count: u32,
}

impl FileHeader {
    pub const MAGIC: [u8; 8] = *b"PGPOOL\0\0";
    pub const VERSION: u32 = 1;

    /// Size of the encoded header in bytes.
    pub const SIZE: usize = 20;

    pub const OFFSET_MAGIC: usize = 0;
    pub const OFFSET_VERSION: usize = 8;
    pub const OFFSET_BLOCK_COUNT: usize = 12;
    pub const OFFSET_CHECKSUM: usize = 16;

    pub fn new(block_count: u32) -> Self {
        Self { block_count }
    }

    /// Decode and validate a header.
    ///
    /// # Errors
    /// `Error::CorruptPageFile` on a short buffer, wrong magic, unknown
    /// version or checksum mismatch.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::CorruptPageFile(format!(
                "header too short: {} bytes",
                data.len()
            )));
        }

        if data[Self::OFFSET_MAGIC..Self::OFFSET_VERSION] != Self::MAGIC {
            return Err(Error::CorruptPageFile("bad magic".to_string()));
        }

        let stored = read_u32(data, Self::OFFSET_CHECKSUM);
        let computed = Self::compute_checksum(data);
        if stored != computed {
            return Err(Error::CorruptPageFile(format!(
                "header checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored, computed
            )));
        }

        let version = read_u32(data, Self::OFFSET_VERSION);
        if version != Self::VERSION {
            return Err(Error::CorruptPageFile(format!(
                "unsupported version {}",
                version
            )));
        }

        Ok(Self {
            block_count: read_u32(data, Self::OFFSET_BLOCK_COUNT),
        })
    }

    /// Encode this header, checksum included, at the start of `data`.
    ///
    /// # Panics
    /// Panics if `data.len() < FileHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for FileHeader");

        data[Self::OFFSET_MAGIC..Self::OFFSET_VERSION].copy_from_slice(&Self::MAGIC);
        data[Self::OFFSET_VERSION..Self::OFFSET_BLOCK_COUNT]
            .copy_from_slice(&Self::VERSION.to_le_bytes());
        data[Self::OFFSET_BLOCK_COUNT..Self::OFFSET_CHECKSUM]
            .copy_from_slice(&self.block_count.to_le_bytes());

        let checksum = Self::compute_checksum(data);
        data[Self::OFFSET_CHECKSUM..Self::SIZE].copy_from_slice(&checksum.to_le_bytes());
    }

    /// CRC32 over everything before the checksum field.
    pub fn compute_checksum(data: &[u8]) -> u32 {
        crc32fast::hash(&data[..Self::OFFSET_CHECKSUM])
    }
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}
