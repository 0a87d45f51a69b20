#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`IoError`](error::IoError) variants for file access and codec failures.
pub mod error;

/// 24-bit BMP image reading and writing.
pub mod bmp;

pub use bmp::{read_image_bmp, write_image_bmp};
pub use error::IoError;
