use dipkit_image::{Complex2D, Image, ImageError};

use super::{fft2d, quadrant_swap};
use crate::color::{clamp_u8, gray_from_rgba};

/// Lift a grayscale image into a complex matrix with zero imaginary part.
pub fn complex_from_gray(src: &Image<u8, 1>) -> Result<Complex2D, ImageError> {
    let real: Vec<f64> = src.as_slice().iter().map(|&v| v as f64).collect();
    Complex2D::from_real(src.rows(), src.cols(), &real)
}

/// Write the real part of a complex matrix as a grayscale image, rounded and saturated.
pub fn gray_from_complex(src: &Complex2D, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice())
        .for_each(|(d, c)| *d = clamp_u8(c.re));
    Ok(())
}

/// Render the magnitude of a spectrum as an 8-bit gray RGBA image.
///
/// Magnitudes are compressed with `ln(1 + |c|)` and stretched linearly so the smallest maps to
/// 0 and the largest to 255. A constant spectrum renders black. Alpha is 255.
///
/// # Arguments
///
/// * `spectrum` - The spectrum, usually centred with [`quadrant_swap`].
/// * `dst` - The output image of the same size.
pub fn magnitude_spectrum(spectrum: &Complex2D, dst: &mut Image<u8, 4>) -> Result<(), ImageError> {
    if spectrum.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            spectrum.cols(),
            spectrum.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let scaled: Vec<f64> = spectrum.as_slice().iter().map(|c| c.norm().ln_1p()).collect();
    let (min, max) = scaled
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    dst.as_slice_mut()
        .chunks_exact_mut(4)
        .zip(&scaled)
        .for_each(|(px, &v)| {
            let level = if range > 0.0 {
                clamp_u8((v - min) / range * 255.0)
            } else {
                0
            };
            px.copy_from_slice(&[level, level, level, 255]);
        });

    Ok(())
}

/// Centred forward spectrum of the luminance of an RGBA image.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedSize`] unless both dimensions are powers of two.
pub fn spectrum_of(src: &Image<u8, 4>) -> Result<Complex2D, ImageError> {
    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    gray_from_rgba(src, &mut gray)?;
    let mut spectrum = complex_from_gray(&gray)?;
    fft2d(&mut spectrum, false)?;
    quadrant_swap(&mut spectrum);
    Ok(spectrum)
}
