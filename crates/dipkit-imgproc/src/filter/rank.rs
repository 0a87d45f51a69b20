use dipkit_image::{Image, ImageError};

use super::{check_window, clipped_window};
use crate::parallel;

fn rank_filter(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    side: i32,
    pick: fn(u8, u8) -> u8,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    let side = check_window(src.size(), side, "window")?;
    let size = src.size();

    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        let (x0, x1, y0, y1) = clipped_window(size, x, y, side);
        let mut acc = [src.pixel(x, y)[0], src.pixel(x, y)[1], src.pixel(x, y)[2]];
        for wy in y0..=y1 {
            for wx in x0..=x1 {
                let px = src.pixel(wx, wy);
                for c in 0..3 {
                    acc[c] = pick(acc[c], px[c]);
                }
            }
        }
        dst_pixel.copy_from_slice(&[acc[0], acc[1], acc[2], src.pixel(x, y)[3]]);
    });

    Ok(())
}

/// Replace every colour channel by its minimum over a `side x side` window.
///
/// The window is clipped at the image bounds. Alpha is copied.
///
/// # Errors
///
/// Returns an error if `side` is not odd and positive or too large for the image.
pub fn min_filter(src: &Image<u8, 4>, dst: &mut Image<u8, 4>, side: i32) -> Result<(), ImageError> {
    rank_filter(src, dst, side, std::cmp::min)
}

/// Replace every colour channel by its maximum over a `side x side` window.
///
/// The window is clipped at the image bounds. Alpha is copied.
///
/// # Errors
///
/// Returns an error if `side` is not odd and positive or too large for the image.
pub fn max_filter(src: &Image<u8, 4>, dst: &mut Image<u8, 4>, side: i32) -> Result<(), ImageError> {
    rank_filter(src, dst, side, std::cmp::max)
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    // 6x6 image whose top-left 3x3 block varies and the rest holds 5
    fn sample() -> Result<Image<u8, 4>, ImageError> {
        let values = [5u8, 1, 9, 3, 7, 2, 8, 6, 4];
        let data = (0..36)
            .map(|i| {
                let (x, y) = (i % 6, i / 6);
                if x < 3 && y < 3 {
                    values[y * 3 + x]
                } else {
                    5
                }
            })
            .flat_map(|v| [v, 255 - v, 100, 42])
            .collect();
        Image::new(
            ImageSize {
                width: 6,
                height: 6,
            },
            data,
        )
    }

    #[test]
    fn min_and_max_windows() -> Result<(), ImageError> {
        let src = sample()?;
        let mut dst = src.clone();
        super::min_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.pixel(1, 1), &[1, 246, 100, 42]);
        assert_eq!(dst.pixel(0, 0), &[1, 248, 100, 42]);
        super::max_filter(&src, &mut dst, 3)?;
        assert_eq!(dst.pixel(1, 1), &[9, 254, 100, 42]);
        assert_eq!(dst.pixel(2, 2), &[7, 253, 100, 42]);
        Ok(())
    }

    #[test]
    fn unit_window_is_identity() -> Result<(), ImageError> {
        let src = sample()?;
        let mut dst = src.clone();
        super::min_filter(&src, &mut dst, 1)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn rejects_bad_windows() -> Result<(), ImageError> {
        let src = sample()?;
        let mut dst = src.clone();
        assert!(super::max_filter(&src, &mut dst, 2).is_err());
        assert!(super::max_filter(&src, &mut dst, 5).is_err());
        Ok(())
    }

    #[test]
    fn window_limited_to_half_the_image() -> Result<(), ImageError> {
        let src = Image::<u8, 4>::from_size_val([8, 8].into(), 9)?;
        let mut dst = src.clone();
        super::min_filter(&src, &mut dst, 3)?;
        super::max_filter(&src, &mut dst, 3)?;
        for side in [5, 7, 9] {
            assert!(matches!(
                super::min_filter(&src, &mut dst, side),
                Err(ImageError::InvalidArgument(_))
            ));
            assert!(matches!(
                super::max_filter(&src, &mut dst, side),
                Err(ImageError::InvalidArgument(_))
            ));
        }
        Ok(())
    }
}
