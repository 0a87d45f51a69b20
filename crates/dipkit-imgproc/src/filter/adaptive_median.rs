use dipkit_image::{Image, ImageError, ImageSize};

use super::{check_window, clipped_window};
use crate::parallel;

/// Minimum, median and maximum of one channel inside a clipped window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowStats {
    min: u8,
    med: u8,
    max: u8,
}

impl WindowStats {
    /// Stage A: the median is not an impulse.
    #[inline]
    fn median_is_interior(&self) -> bool {
        self.min < self.med && self.med < self.max
    }

    /// Stage B: keep the centre value unless it is an impulse.
    #[inline]
    fn decide(&self, centre: u8) -> u8 {
        if self.min < centre && centre < self.max {
            centre
        } else {
            self.med
        }
    }
}

fn window_stats(
    src: &Image<u8, 4>,
    x: usize,
    y: usize,
    channel: usize,
    side: usize,
    buf: &mut Vec<u8>,
) -> WindowStats {
    let (x0, x1, y0, y1) = clipped_window(src.size(), x, y, side);
    buf.clear();
    for wy in y0..=y1 {
        for wx in x0..=x1 {
            buf.push(src.pixel(wx, wy)[channel]);
        }
    }
    let mid = buf.len() / 2;
    let (lower, med, upper) = buf.select_nth_unstable(mid);
    let med = *med;
    WindowStats {
        min: lower.iter().copied().min().unwrap_or(med),
        med,
        max: upper.iter().copied().max().unwrap_or(med),
    }
}

fn validate(
    src: &Image<u8, 4>,
    dst: &Image<u8, 4>,
    min_side: i32,
    max_side: i32,
) -> Result<(usize, usize), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    let min_side = check_window(src.size(), min_side, "minimum window")?;
    let max_side = check_window(src.size(), max_side, "maximum window")?;
    if min_side > max_side {
        return Err(ImageError::InvalidArgument(format!(
            "minimum window {min_side} exceeds maximum window {max_side}"
        )));
    }
    Ok((min_side, max_side))
}

/// Adaptive median filter, reference (serial) variant.
///
/// For every pixel the window grows from `min_side` by 2 until all three colour channels
/// simultaneously have a median strictly between their window minimum and maximum. At that
/// size each channel keeps its value if it is itself strictly inside `(min, max)` and takes the
/// median otherwise. If no window up to `max_side` qualifies the pixel is copied. Alpha is
/// copied.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGBA image.
/// * `min_side` - Initial odd window side.
/// * `max_side` - Largest odd window side.
///
/// # Errors
///
/// Returns an error if a window side is even, non-positive, too large for the image, or if
/// `min_side > max_side`.
pub fn adaptive_median_filter(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    min_side: i32,
    max_side: i32,
) -> Result<(), ImageError> {
    let (min_side, max_side) = validate(src, dst, min_side, max_side)?;
    let ImageSize { width, height } = src.size();
    let mut buf = Vec::with_capacity(max_side * max_side);

    for y in 0..height {
        for x in 0..width {
            let centre = src.pixel(x, y);
            let mut out = [centre[0], centre[1], centre[2], centre[3]];

            let mut side = min_side;
            while side <= max_side {
                let stats = [0, 1, 2].map(|c| window_stats(src, x, y, c, side, &mut buf));
                if stats.iter().all(WindowStats::median_is_interior) {
                    for c in 0..3 {
                        out[c] = stats[c].decide(centre[c]);
                    }
                    break;
                }
                side += 2;
            }

            dst.pixel_mut(x, y).copy_from_slice(&out);
        }
    }

    Ok(())
}

/// Adaptive median filter, work-parallel variant.
///
/// Pixels are distributed over the rayon pool; each writes only its own output cell. Unlike
/// [`adaptive_median_filter`], every colour channel grows its window independently: a channel
/// settles at the first size where its median is not an impulse, and the pixel stops growing as
/// soon as at least one settled channel has changed value. Channels that never settle keep the
/// source value. Alpha is copied.
///
/// # Errors
///
/// Same as [`adaptive_median_filter`].
pub fn adaptive_median_filter_parallel(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    min_side: i32,
    max_side: i32,
) -> Result<(), ImageError> {
    let (min_side, max_side) = validate(src, dst, min_side, max_side)?;

    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        let mut buf = Vec::with_capacity(max_side * max_side);
        let centre = src.pixel(x, y);
        let mut out = [centre[0], centre[1], centre[2], centre[3]];
        let mut settled = [false; 3];

        let mut side = min_side;
        while side <= max_side {
            for c in 0..3 {
                if settled[c] {
                    continue;
                }
                let stats = window_stats(src, x, y, c, side, &mut buf);
                if stats.median_is_interior() {
                    settled[c] = true;
                    out[c] = stats.decide(centre[c]);
                }
            }
            if (0..3).any(|c| out[c] != centre[c]) {
                break;
            }
            side += 2;
        }

        dst_pixel.copy_from_slice(&out);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    fn gray_rgba(width: usize, height: usize, values: &[u8]) -> Result<Image<u8, 4>, ImageError> {
        Image::new(
            ImageSize { width, height },
            values.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        )
    }

    #[test]
    fn window_stats_clip_at_corner() -> Result<(), ImageError> {
        let src = gray_rgba(3, 3, &[1, 2, 3, 4, 5, 6, 7, 8, 9])?;
        let mut buf = Vec::new();
        let s = super::window_stats(&src, 0, 0, 0, 3, &mut buf);
        assert_eq!(
            s,
            super::WindowStats {
                min: 1,
                med: 4,
                max: 5
            }
        );
        let s = super::window_stats(&src, 1, 1, 1, 3, &mut buf);
        assert_eq!(s.med, 5);
        Ok(())
    }

    #[test]
    fn removes_salt_impulse() -> Result<(), ImageError> {
        #[rustfmt::skip]
        let values = [
            10, 20, 30, 40, 50, 60,
            15, 25, 35, 45, 55, 65,
            12, 22, 255, 42, 52, 62,
            18, 28, 38, 48, 58, 68,
            11, 21, 31, 41, 51, 61,
            13, 23, 33, 43, 53, 63,
        ];
        let src = gray_rgba(6, 6, &values)?;
        let mut serial = src.clone();
        let mut parallel = src.clone();
        super::adaptive_median_filter(&src, &mut serial, 3, 3)?;
        super::adaptive_median_filter_parallel(&src, &mut parallel, 3, 3)?;
        // window {25,35,45,22,255,42,28,38,48} has median 38
        assert_eq!(serial.pixel(2, 2), &[38, 38, 38, 255]);
        assert_eq!(parallel.pixel(2, 2), &[38, 38, 38, 255]);
        // a non-impulse pixel is kept
        assert_eq!(serial.pixel(1, 1), src.pixel(1, 1));
        Ok(())
    }

    #[test]
    fn flat_image_is_copied() -> Result<(), ImageError> {
        let src = gray_rgba(6, 6, &[77; 36])?;
        let mut dst = Image::<u8, 4>::from_size_val(src.size(), 0)?;
        super::adaptive_median_filter(&src, &mut dst, 3, 3)?;
        assert_eq!(dst, src);
        super::adaptive_median_filter_parallel(&src, &mut dst, 1, 3)?;
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn variants_differ_when_one_channel_is_flat() -> Result<(), ImageError> {
        // red varies with an impulse in the centre, green and blue are flat
        let red = [10u8, 20, 30, 40, 250, 60, 70, 80, 90];
        let data = (0..36)
            .map(|i| {
                let (x, y) = (i % 6, i / 6);
                if x < 3 && y < 3 {
                    red[y * 3 + x]
                } else {
                    50
                }
            })
            .flat_map(|r| [r, 100, 100, 255])
            .collect();
        let src = Image::<u8, 4>::new(
            ImageSize {
                width: 6,
                height: 6,
            },
            data,
        )?;
        let mut serial = src.clone();
        let mut parallel = src.clone();
        super::adaptive_median_filter(&src, &mut serial, 3, 3)?;
        super::adaptive_median_filter_parallel(&src, &mut parallel, 3, 3)?;
        // flat channels never pass stage A, so the serial variant copies the pixel
        assert_eq!(serial.pixel(1, 1), &[250, 100, 100, 255]);
        // the parallel variant lets red settle on its own
        assert_eq!(parallel.pixel(1, 1), &[60, 100, 100, 255]);
        Ok(())
    }

    #[test]
    fn rejects_bad_sizes() -> Result<(), ImageError> {
        let src = gray_rgba(4, 4, &[0; 16])?;
        let mut dst = src.clone();
        assert!(super::adaptive_median_filter(&src, &mut dst, 5, 3).is_err());
        assert!(super::adaptive_median_filter(&src, &mut dst, 3, 4).is_err());
        assert!(super::adaptive_median_filter_parallel(&src, &mut dst, 3, 7).is_err());
        Ok(())
    }

    #[test]
    fn max_window_limited_to_half_the_image() -> Result<(), ImageError> {
        let src = gray_rgba(8, 8, &[40; 64])?;
        let mut dst = src.clone();
        super::adaptive_median_filter(&src, &mut dst, 3, 3)?;
        super::adaptive_median_filter_parallel(&src, &mut dst, 3, 3)?;
        for max in [5, 9] {
            assert!(matches!(
                super::adaptive_median_filter(&src, &mut dst, 3, max),
                Err(ImageError::InvalidArgument(_))
            ));
            assert!(matches!(
                super::adaptive_median_filter_parallel(&src, &mut dst, 3, max),
                Err(ImageError::InvalidArgument(_))
            ));
        }
        Ok(())
    }
}
