//! Binary morphology
//!
//! Set operations, dilation, erosion, opening, closing, hit-or-miss and iterative thinning
//! over [`BinaryImage`](dipkit_image::BinaryImage) rasters.

/// Structuring elements and thinning templates.
mod element;
pub use element::*;

/// Dilation, erosion and the operators derived from them.
mod ops;
pub use ops::*;

/// Iterative thinning against a template series.
mod thinning;
pub use thinning::*;
