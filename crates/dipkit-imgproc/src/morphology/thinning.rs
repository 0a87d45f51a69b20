use dipkit_image::{BinaryImage, ImageError};

use super::ThinningTemplate;

fn neighbourhood(img: &BinaryImage, x: usize, y: usize) -> [[u8; 3]; 3] {
    let mut cells = [[0u8; 3]; 3];
    for (r, row) in cells.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = img.is_set(x + c - 1, y + r - 1) as u8;
        }
    }
    cells
}

/// Remove, in one sweep, every interior 1-cell whose neighbourhood matches `template`.
///
/// Matches are evaluated against the image as it was before the sweep. Returns the number of
/// cells removed.
fn thin_once(img: &mut BinaryImage, template: &ThinningTemplate) -> usize {
    let (width, height) = (img.width(), img.height());
    let mut hits = Vec::new();
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            if img.is_set(x, y) && template.matches(&neighbourhood(img, x, y)) {
                hits.push((x, y));
            }
        }
    }
    for &(x, y) in &hits {
        img.set(x, y, false);
    }
    hits.len()
}

/// Thin a binary image against a series of 3x3 templates until it stops changing.
///
/// Each pass applies every template of the series in order. The outermost rows and columns are
/// never removed. Every productive pass clears at least one cell, so the number of passes is
/// bounded by the number of set cells.
///
/// # Arguments
///
/// * `src` - The source binary image.
/// * `dst` - The destination binary image (will be overwritten).
/// * `series` - The template series, see [`thinning_series`](super::thinning_series).
///
/// # Returns
///
/// The number of passes, including the final pass that made no change.
pub fn thin(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    series: &[ThinningTemplate],
) -> Result<usize, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    if series.is_empty() {
        return Err(ImageError::InvalidArgument(
            "thinning series must not be empty".to_string(),
        ));
    }

    *dst = src.clone();
    let mut passes = 0;
    loop {
        passes += 1;
        let removed: usize = series.iter().map(|t| thin_once(dst, t)).sum();
        log::debug!("thinning pass {passes}: removed {removed} cells");
        if removed == 0 {
            break;
        }
    }
    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morphology::{THINNING_XI, THINNING_XII};
    use dipkit_image::ImageSize;

    fn filled_rect(width: usize, height: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> BinaryImage {
        let mut img = BinaryImage::zeros(ImageSize { width, height });
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.set(x, y, true);
            }
        }
        img
    }

    #[test]
    fn thin_rectangle_reaches_fixed_point() -> Result<(), ImageError> {
        let src = filled_rect(11, 9, 2, 2, 8, 6);
        let mut dst = BinaryImage::zeros(src.size());
        let passes = thin(&src, &mut dst, &THINNING_XII)?;
        assert!(passes >= 2);
        assert!(passes <= src.count_ones() + 1);
        assert!(dst.count_ones() > 0);
        assert!(dst.count_ones() < src.count_ones());
        assert!(dst
            .as_slice()
            .iter()
            .zip(src.as_slice())
            .all(|(&d, &s)| d <= s));

        let mut again = BinaryImage::zeros(src.size());
        assert_eq!(thin(&dst, &mut again, &THINNING_XII)?, 1);
        assert_eq!(again, dst);
        Ok(())
    }

    #[test]
    fn thin_keeps_single_pixel_line() -> Result<(), ImageError> {
        let src = filled_rect(7, 3, 1, 1, 5, 1);
        let mut dst = BinaryImage::zeros(src.size());
        assert_eq!(thin(&src, &mut dst, &THINNING_XII)?, 1);
        assert_eq!(dst, src);
        assert_eq!(thin(&src, &mut dst, &THINNING_XI)?, 1);
        assert_eq!(dst, src);
        Ok(())
    }

    #[test]
    fn thin_ignores_border() -> Result<(), ImageError> {
        let src = filled_rect(4, 4, 0, 0, 3, 3);
        let mut dst = BinaryImage::zeros(src.size());
        thin(&src, &mut dst, &THINNING_XII)?;
        for i in 0..4 {
            assert!(dst.is_set(i, 0));
            assert!(dst.is_set(i, 3));
            assert!(dst.is_set(0, i));
            assert!(dst.is_set(3, i));
        }
        Ok(())
    }

    #[test]
    fn thin_rejects_empty_series() {
        let src = filled_rect(3, 3, 1, 1, 1, 1);
        let mut dst = BinaryImage::zeros(src.size());
        assert!(thin(&src, &mut dst, &[]).is_err());
    }
}
