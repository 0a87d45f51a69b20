use dipkit_image::{Image, ImageError, ImageSize};

use crate::parallel;

fn check_factor(factor: i32) -> Result<usize, ImageError> {
    if factor < 1 {
        return Err(ImageError::InvalidArgument(format!(
            "scale factor must be >= 1, got {factor}"
        )));
    }
    Ok(factor as usize)
}

/// Size of the image produced by [`shrink`] with the given factor.
///
/// # Errors
///
/// Returns [`ImageError::InvalidArgument`] if `factor < 1` or the result has no pixels.
pub fn shrunk_size(size: ImageSize, factor: i32) -> Result<ImageSize, ImageError> {
    let f = check_factor(factor)?;
    let out = ImageSize {
        width: size.width / f,
        height: size.height / f,
    };
    if out.area() == 0 {
        return Err(ImageError::InvalidArgument(format!(
            "shrinking {}x{} by {factor} leaves an empty image",
            size.width, size.height
        )));
    }
    Ok(out)
}

/// Size of the image produced by [`enlarge`] with the given factor.
///
/// # Errors
///
/// Returns [`ImageError::InvalidArgument`] if `factor < 1` or the result is not addressable.
pub fn enlarged_size(size: ImageSize, factor: i32) -> Result<ImageSize, ImageError> {
    let f = check_factor(factor)?;
    let too_large = || {
        ImageError::InvalidArgument(format!(
            "enlarging {}x{} by {factor} overflows the image size",
            size.width, size.height
        ))
    };
    let out = ImageSize {
        width: size.width.checked_mul(f).ok_or_else(too_large)?,
        height: size.height.checked_mul(f).ok_or_else(too_large)?,
    };
    out.width.checked_mul(out.height).ok_or_else(too_large)?;
    Ok(out)
}

/// Downscale an image by an integer factor using nearest neighbour sampling.
///
/// `dst(x, y) = src(f * x, f * y)` with `dst` of size `floor(W / f) x floor(H / f)`.
///
/// # Errors
///
/// Returns an error if `factor < 1` or `dst` does not have the shrunk size.
pub fn shrink<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    factor: i32,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected = shrunk_size(src.size(), factor)?;
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            expected.width,
            expected.height,
            dst.width(),
            dst.height(),
        ));
    }

    let f = factor as usize;
    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        dst_pixel.copy_from_slice(src.pixel(f * x, f * y));
    });

    Ok(())
}

/// Upscale an image by an integer factor using nearest neighbour sampling.
///
/// `dst(x, y) = src(floor(x / f), floor(y / f))` with `dst` of size `W * f x H * f`.
///
/// # Errors
///
/// Returns an error if `factor < 1` or `dst` does not have the enlarged size.
pub fn enlarge<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    factor: i32,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    let expected = enlarged_size(src.size(), factor)?;
    if dst.size() != expected {
        return Err(ImageError::InvalidImageSize(
            expected.width,
            expected.height,
            dst.width(),
            dst.height(),
        ));
    }

    let f = factor as usize;
    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        dst_pixel.copy_from_slice(src.pixel(x / f, y / f));
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    #[test]
    fn shrink_samples_grid() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::new(
            ImageSize {
                width: 5,
                height: 3,
            },
            (0..15).collect(),
        )?;
        let size = super::shrunk_size(src.size(), 2)?;
        assert_eq!(
            size,
            ImageSize {
                width: 2,
                height: 1
            }
        );
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        super::shrink(&src, &mut dst, 2)?;
        assert_eq!(dst.as_slice(), &[0, 2]);
        Ok(())
    }

    #[test]
    fn enlarge_then_shrink_is_identity() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::new(
            ImageSize {
                width: 3,
                height: 2,
            },
            (0..24).collect(),
        )?;
        for f in 1..4 {
            let mut big = Image::<u8, 4>::from_size_val(super::enlarged_size(src.size(), f)?, 0)?;
            super::enlarge(&src, &mut big, f)?;
            assert_eq!(big.pixel(3 * f as usize - 1, 2 * f as usize - 1), src.pixel(2, 1));
            let mut small = src.clone();
            super::shrink(&big, &mut small, f)?;
            assert_eq!(small, src);
        }
        Ok(())
    }

    #[test]
    fn shrink_to_nothing_is_rejected() {
        let size = ImageSize {
            width: 5,
            height: 3,
        };
        assert!(super::shrunk_size(size, 3).is_ok());
        assert!(matches!(
            super::shrunk_size(size, 4),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn enlarge_overflow_is_rejected() {
        let size = ImageSize {
            width: 512,
            height: 512,
        };
        assert!(matches!(
            super::enlarged_size(size, i32::MAX),
            Err(ImageError::InvalidArgument(_))
        ));
        let wide = ImageSize {
            width: usize::MAX / 2,
            height: 1,
        };
        assert!(matches!(
            super::enlarged_size(wide, 3),
            Err(ImageError::InvalidArgument(_))
        ));
    }

    #[test]
    fn invalid_factor() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([2, 2].into(), 0)?;
        let mut dst = src.clone();
        assert!(matches!(
            super::shrink(&src, &mut dst, 0),
            Err(ImageError::InvalidArgument(_))
        ));
        assert!(matches!(
            super::enlarge(&src, &mut dst, -2),
            Err(ImageError::InvalidArgument(_))
        ));
        Ok(())
    }
}
