use dipkit_image::{Image, ImageError};

use super::colour_pairs;

/// Compute the signal-to-noise ratio of `image2` against the reference `image1`.
///
/// The signal is `image1` and the noise is `image1 - image2`:
///
/// $ SNR = 10 \log_{10} \left( \frac{\sum I_1^2}{\sum (I_1 - I_2)^2} \right) $
///
/// # Returns
///
/// The SNR in dB. Returns `f64::INFINITY` when there is no noise, and also when the signal
/// itself is all zero.
pub fn snr(image1: &Image<u8, 4>, image2: &Image<u8, 4>) -> Result<f64, ImageError> {
    let (signal, noise) = colour_pairs(image1, image2)?
        .fold((0.0, 0.0), |(s, n), (a, b)| (s + a * a, n + (a - b).powi(2)));
    if signal == 0.0 || noise == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (signal / noise).log10())
}
