use crate::parallel;
use dipkit_image::{Image, ImageError};

use super::clamp_u8;

/// Convert one 8-bit RGB triple to HSV.
///
/// Returns `[h, s, v]` with the hue in degrees `[0, 360)` and saturation and value in `[0, 1]`.
pub fn hsv_from_rgb_pixel(r: u8, g: u8, b: u8) -> [f64; 3] {
    // Normalize the input to the range [0, 1]
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    // Ensure h is in the range [0, 360)
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    [h, s, max]
}

/// Convert one HSV triple (hue in degrees, saturation and value in `[0, 1]`) to 8-bit RGB.
pub fn rgb_from_hsv_pixel(h: f64, s: f64, v: f64) -> [u8; 3] {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [
        clamp_u8((r + m) * 255.0),
        clamp_u8((g + m) * 255.0),
        clamp_u8((b + m) * 255.0),
    ]
}

/// Convert an RGBA image to an HSV image.
///
/// # Arguments
///
/// * `src` - The input RGBA image. Alpha is ignored.
/// * `dst` - The output HSV image.
///
/// # Returns
///
/// The HSV image with the following channels:
///
/// * H: The hue channel in degrees `[0, 360)`.
/// * S: The saturation channel in the range `[0, 1]`.
/// * V: The value channel in the range `[0, 1]`.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use dipkit_image::{Image, ImageSize};
/// use dipkit_imgproc::color::hsv_from_rgba;
///
/// let image = Image::<u8, 4>::from_size_pixel(
///     ImageSize {
///        width: 4,
///        height: 5,
///     },
///     [255, 0, 0, 255],
/// )
/// .unwrap();
///
/// let mut hsv = Image::<f64, 3>::from_size_val(image.size(), 0.0).unwrap();
///
/// hsv_from_rgba(&image, &mut hsv).unwrap();
///
/// assert_eq!(hsv.pixel(0, 0), &[0.0, 1.0, 1.0]);
/// ```
pub fn hsv_from_rgba(src: &Image<u8, 4>, dst: &mut Image<f64, 3>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let hsv = hsv_from_rgb_pixel(src_pixel[0], src_pixel[1], src_pixel[2]);
        dst_pixel.copy_from_slice(&hsv);
    });

    Ok(())
}

/// Convert an HSV image back to an opaque RGBA image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgba_from_hsv(src: &Image<f64, 3>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let [r, g, b] = rgb_from_hsv_pixel(src_pixel[0], src_pixel[1], src_pixel[2]);
        dst_pixel.copy_from_slice(&[r, g, b, 255]);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{hsv_from_rgb_pixel, rgb_from_hsv_pixel};
    use approx::assert_relative_eq;
    use dipkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_from_rgb_pixel(0, 255, 0), [120.0, 1.0, 1.0]);
        assert_eq!(hsv_from_rgb_pixel(0, 0, 255), [240.0, 1.0, 1.0]);
        assert_eq!(hsv_from_rgb_pixel(0, 0, 0), [0.0, 0.0, 0.0]);
        let [h, s, v] = hsv_from_rgb_pixel(255, 0, 128);
        assert_relative_eq!(h, 329.882, epsilon = 1e-3);
        assert_relative_eq!(s, 1.0);
        assert_relative_eq!(v, 1.0);
    }

    #[test]
    fn hsv_roundtrip_every_gray_and_some_colours() {
        for g in 0..=255u8 {
            let [h, s, v] = hsv_from_rgb_pixel(g, g, g);
            assert_eq!(rgb_from_hsv_pixel(h, s, v), [g, g, g]);
        }
        for &(r, g, b) in &[(12u8, 200u8, 77u8), (255, 128, 0), (3, 4, 250), (90, 10, 90)] {
            let [h, s, v] = hsv_from_rgb_pixel(r, g, b);
            assert_eq!(rgb_from_hsv_pixel(h, s, v), [r, g, b]);
        }
    }

    #[test]
    fn rgba_from_hsv_sets_alpha() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 1,
            height: 1,
        };
        let hsv = Image::<f64, 3>::new(size, vec![240.0, 1.0, 1.0])?;
        let mut rgba = Image::<u8, 4>::from_size_val(size, 0)?;
        super::rgba_from_hsv(&hsv, &mut rgba)?;
        assert_eq!(rgba.as_slice(), &[0, 0, 255, 255]);
        Ok(())
    }
}
