//! Image similarity metrics.
//!
//! Every metric compares the colour channels of two equally sized RGBA images; alpha is
//! ignored. Degenerate ratios are reported as `f64::INFINITY` rather than as errors.
//!
//! # Available Metrics
//!
//! - **MSE** (Mean Squared Error) and its peak-normalised form
//! - **SNR** (Signal-to-Noise Ratio) in dB
//! - **PSNR** (Peak Signal-to-Noise Ratio) in dB
//! - **Maximum difference** over all pixels and channels

mod difference;
mod mse;
mod snr;

pub use difference::max_difference;
pub use mse::{mse, peak_mse, psnr};
pub use snr::snr;

use dipkit_image::{Image, ImageError};

/// Iterate over the colour samples of both images side by side.
pub(crate) fn colour_pairs<'a>(
    image1: &'a Image<u8, 4>,
    image2: &'a Image<u8, 4>,
) -> Result<impl Iterator<Item = (f64, f64)> + 'a, ImageError> {
    if image1.size() != image2.size() {
        return Err(ImageError::InvalidImageSize(
            image1.width(),
            image1.height(),
            image2.width(),
            image2.height(),
        ));
    }
    Ok(image1
        .as_slice()
        .chunks_exact(4)
        .zip(image2.as_slice().chunks_exact(4))
        .flat_map(|(p, q)| (0..3).map(move |c| (p[c] as f64, q[c] as f64))))
}
