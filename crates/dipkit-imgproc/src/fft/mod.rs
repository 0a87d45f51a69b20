//! Frequency-domain processing.
//!
//! A recursive radix-2 FFT over [`Complex2D`](dipkit_image::Complex2D) matrices, quadrant
//! swapping, magnitude spectra and ideal spectral filters.
//!
//! Scaling convention: the forward transform is unscaled and the inverse halves every butterfly
//! level, so a forward-inverse round trip is the identity and the DC coefficient of the forward
//! transform equals the sum of the samples.

mod filter;
mod spectrum;
mod transform;

pub use filter::{apply_frequency_filter, frequency_filter, FrequencyFilter};
pub use spectrum::{complex_from_gray, gray_from_complex, magnitude_spectrum, spectrum_of};
pub use transform::{fft1d, fft2d, inverse_quadrant_swap, quadrant_swap};
