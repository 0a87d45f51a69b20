use std::f64::consts::PI;

use dipkit_image::{Complex2D, Image, ImageError, ImageSize};
use num_complex::Complex64;

use super::{complex_from_gray, fft2d, gray_from_complex, inverse_quadrant_swap, quadrant_swap};
use crate::color::{gray_from_rgba, rgba_from_gray};
use crate::interpolation::resize_bilinear;

/// An ideal filter over a centred spectrum.
///
/// Radii are measured in coefficients from the centre `(rows / 2, cols / 2)`.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyFilter {
    /// Keep coefficients with radius `<= cutoff`.
    LowPass {
        /// Cutoff radius.
        cutoff: f64,
    },
    /// Keep coefficients with radius `>= cutoff`.
    HighPass {
        /// Cutoff radius.
        cutoff: f64,
    },
    /// Keep coefficients with `low <= radius <= high`.
    BandPass {
        /// Inner radius.
        low: f64,
        /// Outer radius.
        high: f64,
    },
    /// Reject coefficients with `low <= radius <= high`.
    BandCut {
        /// Inner radius.
        low: f64,
        /// Outer radius.
        high: f64,
    },
    /// Multiply by a linear phase ramp, shifting the image by `(k, l)` rows and columns.
    PhaseShift {
        /// Row shift.
        k: i32,
        /// Column shift.
        l: i32,
    },
    /// Zero every coefficient where the mask, bilinearly fitted to the spectrum, is zero.
    Mask(Image<u8, 1>),
}

impl FrequencyFilter {
    /// Check the filter parameters.
    pub fn validate(&self) -> Result<(), ImageError> {
        let radius = |name: &str, r: f64| {
            if r.is_finite() && r >= 0.0 {
                Ok(())
            } else {
                Err(ImageError::InvalidArgument(format!(
                    "{name} must be a finite radius >= 0, got {r}"
                )))
            }
        };
        match self {
            Self::LowPass { cutoff } | Self::HighPass { cutoff } => radius("cutoff", *cutoff),
            Self::BandPass { low, high } | Self::BandCut { low, high } => {
                radius("low", *low)?;
                radius("high", *high)?;
                if low > high {
                    return Err(ImageError::InvalidArgument(format!(
                        "band low radius {low} exceeds high radius {high}"
                    )));
                }
                Ok(())
            }
            Self::PhaseShift { .. } => Ok(()),
            Self::Mask(mask) => {
                if mask.size().area() == 0 {
                    return Err(ImageError::InvalidArgument(
                        "spectral mask must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Whether a coefficient at `radius` passes a radial filter.
    fn passes(&self, radius: f64) -> bool {
        match self {
            Self::LowPass { cutoff } => radius <= *cutoff,
            Self::HighPass { cutoff } => radius >= *cutoff,
            Self::BandPass { low, high } => *low <= radius && radius <= *high,
            Self::BandCut { low, high } => !(*low <= radius && radius <= *high),
            Self::PhaseShift { .. } | Self::Mask(_) => true,
        }
    }
}

/// Apply a filter in place to a centred spectrum.
///
/// # Errors
///
/// Returns [`ImageError::InvalidArgument`] if the filter parameters are invalid.
pub fn apply_frequency_filter(
    spectrum: &mut Complex2D,
    filter: &FrequencyFilter,
) -> Result<(), ImageError> {
    filter.validate()?;
    let (rows, cols) = (spectrum.rows(), spectrum.cols());
    let (cx, cy) = ((rows / 2) as f64, (cols / 2) as f64);

    match filter {
        FrequencyFilter::PhaseShift { k, l } => {
            let (k, l) = (*k as f64, *l as f64);
            for i in 0..rows {
                for j in 0..cols {
                    let angle = -2.0 * PI * k * i as f64 / rows as f64
                        - 2.0 * PI * l * j as f64 / cols as f64
                        + PI * (k + l);
                    let value = spectrum.get(i, j) * Complex64::from_polar(1.0, angle);
                    spectrum.set(i, j, value);
                }
            }
        }
        FrequencyFilter::Mask(mask) => {
            let mask = mask.cast::<f64>()?;
            let mut fitted = Image::<f64, 1>::from_size_val(
                ImageSize {
                    width: cols,
                    height: rows,
                },
                0.0,
            )?;
            resize_bilinear(&mask, &mut fitted)?;
            spectrum
                .as_slice_mut()
                .iter_mut()
                .zip(fitted.as_slice())
                .filter(|(_, &m)| m == 0.0)
                .for_each(|(c, _)| *c = Complex64::new(0.0, 0.0));
        }
        radial => {
            for i in 0..rows {
                for j in 0..cols {
                    let radius = ((i as f64 - cx).powi(2) + (j as f64 - cy).powi(2)).sqrt();
                    if !radial.passes(radius) {
                        spectrum.set(i, j, Complex64::new(0.0, 0.0));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Filter the luminance of an image in the frequency domain.
///
/// The luminance is transformed, centred, filtered, shifted back and transformed inversely.
/// The original DC coefficient is restored before the inverse transform so the mean brightness
/// survives. The real part is written to all three colour channels; alpha is 255.
///
/// # Arguments
///
/// * `src` - The input RGBA image; both dimensions must be powers of two.
/// * `dst` - The output RGBA image.
/// * `filter` - The filter to apply.
///
/// # Returns
///
/// The filtered centred spectrum, for visualisation.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedSize`] for non power-of-two images and
/// [`ImageError::InvalidArgument`] for invalid filter parameters.
pub fn frequency_filter(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    filter: &FrequencyFilter,
) -> Result<Complex2D, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    filter.validate()?;

    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    gray_from_rgba(src, &mut gray)?;

    let mut spectrum = complex_from_gray(&gray)?;
    fft2d(&mut spectrum, false)?;
    let dc = spectrum.get(0, 0);

    quadrant_swap(&mut spectrum);
    apply_frequency_filter(&mut spectrum, filter)?;
    let centred = spectrum.clone();

    inverse_quadrant_swap(&mut spectrum);
    spectrum.set(0, 0, dc);
    fft2d(&mut spectrum, true)?;

    gray_from_complex(&spectrum, &mut gray)?;
    rgba_from_gray(&gray, dst)?;

    Ok(centred)
}
