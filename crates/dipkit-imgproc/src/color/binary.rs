use dipkit_image::{BinaryImage, Image, ImageError};

use super::luma;

/// Threshold an RGBA image into a binary image.
///
/// A cell is set when the pixel luminance is at least `threshold`.
pub fn binary_from_rgba(src: &Image<u8, 4>, threshold: u8) -> Result<BinaryImage, ImageError> {
    let data = src
        .as_slice()
        .chunks_exact(4)
        .map(|px| (luma(px[0], px[1], px[2]) >= threshold as f64) as u8)
        .collect();
    BinaryImage::new(src.size(), data)
}

/// Render a binary image as opaque RGBA: set cells white, cleared cells black.
///
/// Precondition: the input and output images must have the same size.
pub fn rgba_from_binary(src: &BinaryImage, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.cols(),
            dst.rows(),
        ));
    }

    src.as_slice()
        .iter()
        .zip(dst.as_slice_mut().chunks_exact_mut(4))
        .for_each(|(&bit, dst_pixel)| {
            let v = if bit == 1 { 255 } else { 0 };
            dst_pixel.copy_from_slice(&[v, v, v, 255]);
        });

    Ok(())
}
