//! Filter operations
//!
//! Spatial-domain filters over 8-bit RGBA images: integer mask convolution, the Kirsch
//! compass edge detector, rank filters and the adaptive median denoiser.

/// Adaptive median denoiser, serial and work-parallel variants.
mod adaptive_median;
pub use adaptive_median::*;

/// Integer mask convolution over luminance.
mod convolution;
pub use convolution::*;

/// Kirsch compass edge detector.
mod kirsch;
pub use kirsch::*;

/// Min and max rank filters.
mod rank;
pub use rank::*;

use dipkit_image::{ImageError, ImageSize};

/// Check that an odd window side is usable on an image of the given size.
///
/// The side may not exceed half of the smaller image dimension.
pub(crate) fn check_window(size: ImageSize, side: i32, what: &str) -> Result<usize, ImageError> {
    if side < 1 || side % 2 == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "{what} must be an odd size >= 1, got {side}"
        )));
    }
    if side as usize > size.width.min(size.height) / 2 {
        return Err(ImageError::InvalidArgument(format!(
            "{what} {side} is too large for a {}x{} image",
            size.width, size.height
        )));
    }
    Ok(side as usize)
}

/// Inclusive bounds of a `side x side` window centred at `(x, y)`, clipped to the image.
#[inline]
pub(crate) fn clipped_window(
    size: ImageSize,
    x: usize,
    y: usize,
    side: usize,
) -> (usize, usize, usize, usize) {
    let r = side / 2;
    (
        x.saturating_sub(r),
        (x + r).min(size.width - 1),
        y.saturating_sub(r),
        (y + r).min(size.height - 1),
    )
}
