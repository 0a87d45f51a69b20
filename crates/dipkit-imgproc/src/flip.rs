use dipkit_image::{Image, ImageError};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::{ParallelSlice, ParallelSliceMut},
};

/// Flip the input image horizontally (mirror the columns).
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
///
/// # Example
///
/// ```
/// use dipkit_image::{Image, ImageSize};
/// use dipkit_imgproc::flip::horizontal_flip;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 3,
///     },
///     vec![0, 1, 2, 3, 4, 5],
/// )
/// .unwrap();
///
/// let mut flipped = image.clone();
/// horizontal_flip(&image, &mut flipped).unwrap();
///
/// assert_eq!(flipped.as_slice(), &[1, 0, 3, 2, 5, 4]);
/// ```
pub fn horizontal_flip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let row_len = (src.cols() * C).max(1);
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .zip_eq(src.as_slice().par_chunks_exact(row_len))
        .for_each(|(dst_row, src_row)| {
            dst_row
                .chunks_exact_mut(C)
                .zip(src_row.chunks_exact(C).rev())
                .for_each(|(dst_pixel, src_pixel)| {
                    dst_pixel.copy_from_slice(src_pixel);
                });
        });

    Ok(())
}

/// Flip the input image vertically (mirror the rows).
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (H, W, C).
pub fn vertical_flip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let row_len = (src.cols() * C).max(1);
    dst.as_slice_mut()
        .par_chunks_exact_mut(row_len)
        .zip_eq(src.as_slice().par_chunks_exact(row_len).rev())
        .for_each(|(dst_row, src_row)| dst_row.copy_from_slice(src_row));

    Ok(())
}

/// Flip the input image across its anti-diagonal.
///
/// The result is the 180 degree rotation of the transposed image, so a W x H input yields an
/// H x W output with `dst(x, y) = src(W - 1 - y, H - 1 - x)`. Applying it twice restores the
/// input exactly.
///
/// # Arguments
///
/// * `src` - The input image with shape (H, W, C).
/// * `dst` - The output image with shape (W, H, C).
pub fn diagonal_flip<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync,
{
    if src.size().transposed() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.rows(),
            src.cols(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (src_w, src_h) = (src.cols(), src.rows());
    crate::parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        dst_pixel.copy_from_slice(src.pixel(src_w - 1 - y, src_h - 1 - x));
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    fn sample() -> Result<Image<u8, 1>, ImageError> {
        Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0u8, 1, 2, 3, 4, 5],
        )
    }

    #[test]
    fn test_hflip() -> Result<(), ImageError> {
        let image = sample()?;
        let mut flipped = image.clone();
        super::horizontal_flip(&image, &mut flipped)?;
        assert_eq!(flipped.as_slice(), &[1u8, 0, 3, 2, 5, 4]);
        Ok(())
    }

    #[test]
    fn test_vflip() -> Result<(), ImageError> {
        let image = sample()?;
        let mut flipped = image.clone();
        super::vertical_flip(&image, &mut flipped)?;
        assert_eq!(flipped.as_slice(), &[4u8, 5, 2, 3, 0, 1]);
        Ok(())
    }

    #[test]
    fn test_dflip() -> Result<(), ImageError> {
        let image = sample()?;
        let mut flipped = Image::<u8, 1>::from_size_val(image.size().transposed(), 0)?;
        super::diagonal_flip(&image, &mut flipped)?;
        assert_eq!(flipped.width(), 3);
        assert_eq!(flipped.height(), 2);
        assert_eq!(flipped.as_slice(), &[5u8, 3, 1, 4, 2, 0]);

        let mut back = image.clone();
        super::diagonal_flip(&flipped, &mut back)?;
        assert_eq!(back, image);
        Ok(())
    }

    #[test]
    fn test_flips_on_checkerboard() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0, 255, 255, 0],
        )?;
        let mut out = image.clone();
        super::horizontal_flip(&image, &mut out)?;
        assert_eq!(out.as_slice(), &[255, 0, 0, 255]);
        super::vertical_flip(&image, &mut out)?;
        assert_eq!(out.as_slice(), &[255, 0, 0, 255]);
        super::diagonal_flip(&image, &mut out)?;
        assert_eq!(out.as_slice(), &[0, 255, 255, 0]);
        Ok(())
    }

    #[test]
    fn test_flip_involutions_rgba() -> Result<(), ImageError> {
        let data: Vec<u8> = (0..5 * 3 * 4).map(|v| v as u8).collect();
        let image = Image::<u8, 4>::new(
            ImageSize {
                width: 5,
                height: 3,
            },
            data,
        )?;
        let mut once = image.clone();
        let mut twice = image.clone();
        super::horizontal_flip(&image, &mut once)?;
        super::horizontal_flip(&once, &mut twice)?;
        assert_eq!(twice, image);
        super::vertical_flip(&image, &mut once)?;
        super::vertical_flip(&once, &mut twice)?;
        assert_eq!(twice, image);
        Ok(())
    }
}
