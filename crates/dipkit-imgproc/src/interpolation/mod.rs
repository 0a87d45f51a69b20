//! Pixel interpolation for resampling.
//!
//! Used to fit spectral masks of arbitrary size onto a spectrum.

mod bilinear;

pub use bilinear::resize_bilinear;
