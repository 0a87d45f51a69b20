use dipkit_image::{BinaryImage, ImageError, ImageSize};

use super::StructuringElement;

fn check_size(src: ImageSize, dst: ImageSize) -> Result<(), ImageError> {
    if src != dst {
        return Err(ImageError::InvalidImageSize(
            src.width, src.height, dst.width, dst.height,
        ));
    }
    Ok(())
}

#[inline]
fn translate(size: ImageSize, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
    let px = x.checked_add_signed(dx)?;
    let py = y.checked_add_signed(dy)?;
    (px < size.width && py < size.height).then_some((px, py))
}

/// Complement of a binary image: every cell flipped.
pub fn complement(src: &BinaryImage, dst: &mut BinaryImage) -> Result<(), ImageError> {
    check_size(src.size(), dst.size())?;
    for y in 0..src.height() {
        for x in 0..src.width() {
            dst.set(x, y, !src.is_set(x, y));
        }
    }
    Ok(())
}

/// Intersection of two binary images of equal size.
pub fn intersection(
    a: &BinaryImage,
    b: &BinaryImage,
    dst: &mut BinaryImage,
) -> Result<(), ImageError> {
    check_size(a.size(), b.size())?;
    check_size(a.size(), dst.size())?;
    for y in 0..a.height() {
        for x in 0..a.width() {
            dst.set(x, y, a.is_set(x, y) && b.is_set(x, y));
        }
    }
    Ok(())
}

/// Dilate a binary image with a structuring element.
///
/// Every 1-cell of `src` stamps the element, translated so that its origin lies on the cell.
/// Stamps that fall outside the image are discarded.
///
/// # Arguments
///
/// * `src` - The source binary image.
/// * `dst` - The destination binary image (will be overwritten).
/// * `se` - The structuring element.
pub fn dilate(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    se: &StructuringElement,
) -> Result<(), ImageError> {
    check_size(src.size(), dst.size())?;
    let size = src.size();
    let offsets = se.offsets();
    *dst = BinaryImage::zeros(size);
    for y in 0..size.height {
        for x in 0..size.width {
            if !src.is_set(x, y) {
                continue;
            }
            for &(dx, dy) in &offsets {
                if let Some((px, py)) = translate(size, x, y, dx, dy) {
                    dst.set(px, py, true);
                }
            }
        }
    }
    Ok(())
}

/// Erode a binary image with a structuring element.
///
/// A cell is set iff every 1-cell of the translated element that lies inside the image covers a
/// 1-cell of `src`. Element cells falling outside the image are ignored, so regions touching the
/// border erode into it instead of vanishing.
///
/// # Arguments
///
/// * `src` - The source binary image.
/// * `dst` - The destination binary image (will be overwritten).
/// * `se` - The structuring element.
pub fn erode(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    se: &StructuringElement,
) -> Result<(), ImageError> {
    check_size(src.size(), dst.size())?;
    let size = src.size();
    let offsets = se.offsets();
    for y in 0..size.height {
        for x in 0..size.width {
            let fits = offsets.iter().all(|&(dx, dy)| {
                translate(size, x, y, dx, dy).map_or(true, |(px, py)| src.is_set(px, py))
            });
            dst.set(x, y, fits);
        }
    }
    Ok(())
}

/// Morphological opening: erosion followed by dilation.
pub fn open(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    se: &StructuringElement,
) -> Result<(), ImageError> {
    check_size(src.size(), dst.size())?;
    let mut eroded = BinaryImage::zeros(src.size());
    erode(src, &mut eroded, se)?;
    dilate(&eroded, dst, se)
}

/// Morphological closing: dilation followed by erosion.
pub fn close(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    se: &StructuringElement,
) -> Result<(), ImageError> {
    check_size(src.size(), dst.size())?;
    let mut dilated = BinaryImage::zeros(src.size());
    dilate(src, &mut dilated, se)?;
    erode(&dilated, dst, se)
}

/// Hit-or-miss transform.
///
/// Cells where `foreground` fits the set and `background` fits its complement.
///
/// # Arguments
///
/// * `src` - The source binary image.
/// * `dst` - The destination binary image (will be overwritten).
/// * `foreground` - Element probing the 1-cells.
/// * `background` - Element probing the 0-cells.
pub fn hit_or_miss(
    src: &BinaryImage,
    dst: &mut BinaryImage,
    foreground: &StructuringElement,
    background: &StructuringElement,
) -> Result<(), ImageError> {
    check_size(src.size(), dst.size())?;
    let size = src.size();

    let mut hits = BinaryImage::zeros(size);
    erode(src, &mut hits, foreground)?;

    let mut inverse = BinaryImage::zeros(size);
    complement(src, &mut inverse)?;
    let mut misses = BinaryImage::zeros(size);
    erode(&inverse, &mut misses, background)?;

    intersection(&hits, &misses, dst)
}
