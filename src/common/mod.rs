//! Shared primitives: configuration, errors and identifiers.

pub mod config;
pub mod error;
mod frame_id;
mod page_id;

pub use config::{BufferPoolConfig, ShutdownPolicy};
pub use error::{Error, Result};
pub use frame_id::FrameId;
pub use page_id::PageId;
