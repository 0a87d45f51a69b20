#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color space conversions module.
pub mod color;

/// utilities to draw on images.
pub mod draw;

/// image enhancement module.
pub mod enhance;

/// frequency domain transforms and filters.
pub mod fft;

/// spatial filtering and denoising module.
pub mod filter;

/// image flipping module.
pub mod flip;

/// compute image histogram module.
pub mod histogram;

/// utilities for interpolation.
pub mod interpolation;

/// image similarity metrics module.
pub mod metrics;

/// binary morphology module.
pub mod morphology;

/// module containing parallization utilities.
pub mod parallel;

/// seeded region growing.
pub mod region_grow;

/// utility functions for resizing images.
pub mod resize;

pub mod resources;
