use dipkit_image::{Image, ImageError};

use crate::parallel;

fn check_same_size<const C: usize>(
    src: &Image<u8, C>,
    dst: &Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

/// Adjust the brightness of an RGBA image by a percentage of the full intensity range.
///
/// dst(x,y,c) = clamp(src(x,y,c) + percent * 255 / 100)
///
/// The offset is computed with integer division, so `percent = 50` adds 127.
/// The alpha channel is copied unchanged.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image to store the result.
/// * `percent` - Brightness change in `[-100, 100]`.
///
/// # Errors
///
/// Returns an error if `percent` is out of range or the sizes of `src` and `dst` differ.
///
/// # Example
///
/// ```
/// use dipkit_image::{Image, ImageSize};
/// use dipkit_imgproc::enhance::adjust_brightness;
///
/// let src = Image::<u8, 4>::from_size_val(ImageSize { width: 4, height: 4 }, 0).unwrap();
/// let mut dst = src.clone();
/// adjust_brightness(&src, &mut dst, 50).unwrap();
/// assert_eq!(dst.pixel(0, 0), &[127, 127, 127, 0]);
/// ```
pub fn adjust_brightness(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    percent: i32,
) -> Result<(), ImageError> {
    if !(-100..=100).contains(&percent) {
        return Err(ImageError::InvalidArgument(format!(
            "brightness must be within [-100, 100], got {percent}"
        )));
    }
    check_same_size(src, dst)?;

    let offset = percent * 255 / 100;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for c in 0..3 {
            dst_pixel[c] = (src_pixel[c] as i32 + offset).clamp(0, 255) as u8;
        }
        dst_pixel[3] = src_pixel[3];
    });

    Ok(())
}

/// Adjust the contrast of an RGBA image.
///
/// With `F = 259 * (k + 255) / (255 * (259 - k))` every colour channel becomes
/// `clamp(round(F * (c - 128) + 128))`. `k = 0` is the identity.
/// The alpha channel is copied unchanged.
///
/// # Errors
///
/// Returns an error if `k` is outside `[-255, 255]` or the sizes of `src` and `dst` differ.
pub fn adjust_contrast(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    k: i32,
) -> Result<(), ImageError> {
    if !(-255..=255).contains(&k) {
        return Err(ImageError::InvalidArgument(format!(
            "contrast must be within [-255, 255], got {k}"
        )));
    }
    check_same_size(src, dst)?;

    let k = k as f64;
    let factor = 259.0 * (k + 255.0) / (255.0 * (259.0 - k));

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for c in 0..3 {
            let v = factor * (src_pixel[c] as f64 - 128.0) + 128.0;
            dst_pixel[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        dst_pixel[3] = src_pixel[3];
    });

    Ok(())
}

/// Invert the colour channels of an RGBA image: `c' = 255 - c`.
///
/// The alpha channel is copied unchanged.
pub fn negative(src: &Image<u8, 4>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        for c in 0..3 {
            dst_pixel[c] = 255 - src_pixel[c];
        }
        dst_pixel[3] = src_pixel[3];
    });

    Ok(())
}
