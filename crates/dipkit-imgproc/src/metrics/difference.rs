use dipkit_image::{Image, ImageError};

use super::colour_pairs;

/// Largest absolute difference between corresponding colour samples.
pub fn max_difference(image1: &Image<u8, 4>, image2: &Image<u8, 4>) -> Result<u8, ImageError> {
    Ok(colour_pairs(image1, image2)?
        .map(|(a, b)| (a - b).abs() as u8)
        .max()
        .unwrap_or(0))
}
