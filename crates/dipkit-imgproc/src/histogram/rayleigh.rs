use dipkit_image::{Image, ImageError};

use super::{Channel, Histogram};
use crate::{color, parallel};

const EPSILON: f64 = 1e-10;

/// Enhance contrast by mapping the luminance distribution onto a Rayleigh distribution.
///
/// The cumulative distribution `C` of the luminance histogram is inverted through the Rayleigh
/// quantile function. Each pixel keeps its hue and saturation; its HSV value `V` (quantised to
/// `f = round(255 * V)`) is replaced by
///
/// `V' = clamp(gmin + sqrt(2 * alpha^2 * ln(1 / max(1 - C[f], 1e-10))), gmin, gmax) / 255`.
///
/// The output is opaque.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGBA image.
/// * `gmin` - Lowest output intensity.
/// * `gmax` - Highest output intensity.
/// * `alpha` - Rayleigh scale parameter, must be positive.
///
/// # Errors
///
/// Returns an error unless `0 <= gmin < gmax <= 255` and `alpha > 0`, or if the sizes differ.
pub fn rayleigh(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    gmin: i32,
    gmax: i32,
    alpha: f64,
) -> Result<(), ImageError> {
    if !(0 <= gmin && gmin < gmax && gmax <= 255) {
        return Err(ImageError::InvalidArgument(format!(
            "rayleigh bounds must satisfy 0 <= min < max <= 255, got min={gmin} max={gmax}"
        )));
    }
    if !(alpha.is_finite() && alpha > 0.0) {
        return Err(ImageError::InvalidArgument(format!(
            "rayleigh alpha must be positive, got {alpha}"
        )));
    }
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let cdf = Histogram::from_image(src, Channel::Luma).cumulative();
    let (lo, hi) = (gmin as f64, gmax as f64);

    // the mapping only depends on the quantised value, so tabulate it
    let mut lut = [0.0f64; 256];
    for (f, v) in lut.iter_mut().enumerate() {
        let tail = (1.0 - cdf[f]).max(EPSILON);
        let mapped = lo + (2.0 * alpha * alpha * (1.0 / tail).ln()).sqrt();
        *v = mapped.clamp(lo, hi) / 255.0;
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let [h, s, v] = color::hsv_from_rgb_pixel(src_pixel[0], src_pixel[1], src_pixel[2]);
        let f = (v * 255.0).round() as usize;
        let [r, g, b] = color::rgb_from_hsv_pixel(h, s, lut[f.min(255)]);
        dst_pixel.copy_from_slice(&[r, g, b, 255]);
    });

    Ok(())
}
