use crate::parallel;
use dipkit_image::{Image, ImageError};

/// Define the RGB weights for the grayscale conversion.
const RW: f64 = 0.299;
const GW: f64 = 0.587;
const BW: f64 = 0.114;

/// Luminance of an 8-bit RGB triple.
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    RW * r as f64 + GW * g as f64 + BW * b as f64
}

/// Round and saturate a floating point intensity into the 8-bit range.
#[inline]
pub fn clamp_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGBA image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// The alpha channel is ignored.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use dipkit_image::{Image, ImageSize};
/// use dipkit_imgproc::color::gray_from_rgba;
///
/// let image = Image::<u8, 4>::from_size_pixel(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     [255, 255, 255, 255],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgba(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice()[0], 255);
/// ```
pub fn gray_from_rgba(src: &Image<u8, 4>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the grayscale conversion by rows
    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = clamp_u8(luma(src_pixel[0], src_pixel[1], src_pixel[2]));
    });

    Ok(())
}

/// Convert a grayscale image to an RGBA image by replicating the grayscale value across the
/// three colour channels. Alpha is set to opaque.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGBA image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgba_from_gray(src: &Image<u8, 1>, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        let g = src_pixel[0];
        dst_pixel.copy_from_slice(&[g, g, g, 255]);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn gray_from_rgba() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![255, 0, 0, 255, 10, 20, 30, 0],
        )?;
        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        super::gray_from_rgba(&image, &mut gray)?;
        // 0.299 * 255 = 76.245 ; 2.99 + 11.74 + 3.42 = 18.15
        assert_eq!(gray.as_slice(), &[76, 18]);
        Ok(())
    }

    #[test]
    fn rgba_from_gray() -> Result<(), ImageError> {
        let gray = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![7, 200],
        )?;
        let mut rgba = Image::<u8, 4>::from_size_val(gray.size(), 0)?;
        super::rgba_from_gray(&gray, &mut rgba)?;
        assert_eq!(rgba.as_slice(), &[7, 7, 7, 255, 200, 200, 200, 255]);
        Ok(())
    }

    #[test]
    fn gray_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_val([2, 2].into(), 0)?;
        let mut gray = Image::<u8, 1>::from_size_val([3, 2].into(), 0)?;
        assert!(super::gray_from_rgba(&image, &mut gray).is_err());
        Ok(())
    }
}
