use dipkit_image::{Image, ImageError};

use super::colour_pairs;

/// Compute the mean squared error (MSE) between two images.
///
/// The MSE is defined as:
///
/// $ MSE = \frac{1}{3WH} \sum_{c \in \{R,G,B\}} \sum_{x,y} (I_1 - I_2)^2 $
///
/// # Arguments
///
/// * `image1` - The first input image.
/// * `image2` - The second input image.
///
/// # Returns
///
/// The mean squared error between the two images.
///
/// # Example
///
/// ```
/// use dipkit_image::{Image, ImageSize};
/// use dipkit_imgproc::metrics::mse;
///
/// let size = ImageSize { width: 1, height: 1 };
/// let image1 = Image::<u8, 4>::new(size, vec![10, 20, 30, 255]).unwrap();
/// let image2 = Image::<u8, 4>::new(size, vec![13, 20, 30, 0]).unwrap();
///
/// assert_eq!(mse(&image1, &image2).unwrap(), 3.0);
/// ```
///
/// # Errors
///
/// Returns [`ImageError::InvalidImageSize`] if the two images have different sizes.
pub fn mse(image1: &Image<u8, 4>, image2: &Image<u8, 4>) -> Result<f64, ImageError> {
    let n = (3 * image1.size().area()) as f64;
    let sum = colour_pairs(image1, image2)?
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>();
    if n == 0.0 {
        return Ok(0.0);
    }
    Ok(sum / n)
}

/// Compute the peak mean squared error, the MSE divided by `255^2`.
pub fn peak_mse(image1: &Image<u8, 4>, image2: &Image<u8, 4>) -> Result<f64, ImageError> {
    Ok(mse(image1, image2)? / (255.0 * 255.0))
}

/// Compute the peak signal-to-noise ratio (PSNR) between two images.
///
/// The PSNR is defined as:
///
/// $ PSNR = 10 \log_{10} \left( \frac{255^2}{MSE} \right) $
///
/// # Returns
///
/// The PSNR in dB, or `f64::INFINITY` when the images are identical.
pub fn psnr(image1: &Image<u8, 4>, image2: &Image<u8, 4>) -> Result<f64, ImageError> {
    let mse = mse(image1, image2)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(10.0 * (255.0 * 255.0 / mse).log10())
}

#[cfg(test)]
mod tests {
    use dipkit_image::{Image, ImageError, ImageSize};

    fn gray(width: usize, height: usize, values: &[u8]) -> Result<Image<u8, 4>, ImageError> {
        Image::new(
            ImageSize { width, height },
            values.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        )
    }

    #[test]
    fn test_mse_identity() -> Result<(), ImageError> {
        let image = gray(2, 2, &[0, 64, 128, 255])?;
        assert_eq!(super::mse(&image, &image)?, 0.0);
        assert_eq!(super::psnr(&image, &image)?, f64::INFINITY);
        Ok(())
    }

    #[test]
    fn test_mse_ignores_alpha() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let image1 = Image::new(size, vec![0, 0, 0, 0, 10, 10, 10, 0])?;
        let image2 = Image::new(size, vec![2, 0, 0, 255, 10, 10, 12, 255])?;
        // (4 + 4) / 6
        approx::assert_relative_eq!(super::mse(&image1, &image2)?, 8.0 / 6.0);
        approx::assert_relative_eq!(super::peak_mse(&image1, &image2)?, 8.0 / 6.0 / 65025.0);
        Ok(())
    }

    #[test]
    fn test_psnr_of_negative() -> Result<(), ImageError> {
        // three pixels differ by 127 from their negative and one by 129, so
        // MSE = (3 * 127^2 + 129^2) / 4 = 16257 and PSNR = 10 log10(65025 / 16257)
        let image = gray(2, 2, &[64, 64, 64, 63])?;
        let negative = gray(2, 2, &[191, 191, 191, 192])?;
        let psnr = super::psnr(&image, &negative)?;
        approx::assert_abs_diff_eq!(psnr, 6.0206, epsilon = 0.01);
        approx::assert_relative_eq!(psnr, 10.0 * (65025.0f64 / 16257.0).log10());
        Ok(())
    }

    #[test]
    fn test_mse_size_mismatch() -> Result<(), ImageError> {
        let image1 = gray(2, 2, &[0; 4])?;
        let image2 = gray(4, 1, &[0; 4])?;
        assert_eq!(
            super::mse(&image1, &image2),
            Err(ImageError::InvalidImageSize(2, 2, 4, 1))
        );
        Ok(())
    }
}
