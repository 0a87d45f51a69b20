use dipkit_image::{Image, ImageError};

use crate::parallel;

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<f64, C>,
    u: f64,
    v: f64,
) -> [f64; C] {
    let (rows, cols) = (image.rows(), image.cols());

    let iu0 = (u.trunc() as usize).min(cols - 1);
    let iv0 = (v.trunc() as usize).min(rows - 1);

    let frac_u = u.fract();
    let frac_v = v.fract();

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let iu1 = if iu0 + 1 < cols { iu0 + 1 } else { iu0 };
    let iv1 = if iv0 + 1 < rows { iv0 + 1 } else { iv0 };

    let p00 = image.pixel(iu0, iv0);
    let p01 = image.pixel(iu1, iv0);
    let p10 = image.pixel(iu0, iv1);
    let p11 = image.pixel(iu1, iv1);

    let mut pixel = [0.0; C];
    for k in 0..C {
        pixel[k] = p00[k] * w00 + p01[k] * w01 + p10[k] * w10 + p11[k] * w11;
    }

    pixel
}

/// Resize an image to the size of `dst` with bilinear interpolation.
///
/// Corner samples map onto corner samples.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, already allocated at the target size.
///
/// # Errors
///
/// Returns [`ImageError::InvalidArgument`] if either image is empty.
pub fn resize_bilinear<const C: usize>(
    src: &Image<f64, C>,
    dst: &mut Image<f64, C>,
) -> Result<(), ImageError> {
    if src.size().area() == 0 || dst.size().area() == 0 {
        return Err(ImageError::InvalidArgument(
            "cannot resize an empty image".to_string(),
        ));
    }

    let scale = |from: usize, to: usize| {
        if to > 1 {
            (from - 1) as f64 / (to - 1) as f64
        } else {
            0.0
        }
    };
    let step_u = scale(src.width(), dst.width());
    let step_v = scale(src.height(), dst.height());

    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        let value = bilinear_interpolation(src, x as f64 * step_u, y as f64 * step_v);
        dst_pixel.copy_from_slice(&value);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn bilinear_midpoint() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0, 10.0, 20.0, 30.0],
        )?;
        assert_eq!(super::bilinear_interpolation(&image, 0.5, 0.5), [15.0]);
        assert_eq!(super::bilinear_interpolation(&image, 1.0, 1.0), [30.0]);
        Ok(())
    }

    #[test]
    fn resize_bilinear_upscale() -> Result<(), ImageError> {
        let src = Image::<f64, 1>::new(
            ImageSize {
                width: 2,
                height: 1,
            },
            vec![0.0, 1.0],
        )?;
        let mut dst = Image::<f64, 1>::from_size_val(
            ImageSize {
                width: 5,
                height: 2,
            },
            0.0,
        )?;
        super::resize_bilinear(&src, &mut dst)?;
        assert_eq!(
            dst.as_slice(),
            &[0.0, 0.25, 0.5, 0.75, 1.0, 0.0, 0.25, 0.5, 0.75, 1.0]
        );
        Ok(())
    }
}
