#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for image processing purposes.
pub mod image;

/// binary (0/1) raster used by morphology.
pub mod binary;

/// complex-valued matrix used by the frequency transforms.
pub mod complex;

/// Error types for the image module.
pub mod error;

pub use crate::binary::BinaryImage;
pub use crate::complex::Complex2D;
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};

/// An 8-bit RGBA raster.
pub type Rgba8 = Image<u8, 4>;

/// An 8-bit single channel luminance raster.
pub type Gray8 = Image<u8, 1>;
