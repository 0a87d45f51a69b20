use num_complex::Complex64;

use crate::error::ImageError;
use crate::image::ImageSize;

/// A dense row-major matrix of double precision complex numbers.
///
/// Holds spatial samples (imaginary part zero) as well as spectral coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct Complex2D {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl Complex2D {
    /// Create a matrix from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidChannelShape`] if `data` does not hold `rows * cols` values.
    pub fn new(rows: usize, cols: usize, data: Vec<Complex64>) -> Result<Self, ImageError> {
        if data.len() != rows * cols {
            return Err(ImageError::InvalidChannelShape(data.len(), rows * cols));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![Complex64::new(0.0, 0.0); rows * cols],
        }
    }

    /// Create a matrix of real samples.
    pub fn from_real(rows: usize, cols: usize, real: &[f64]) -> Result<Self, ImageError> {
        Self::new(
            rows,
            cols,
            real.iter().map(|&r| Complex64::new(r, 0.0)).collect(),
        )
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The matrix extent as an image size (width = cols, height = rows).
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.cols,
            height: self.rows,
        }
    }

    /// Coefficient at `(row, col)`.
    ///
    /// PRECONDITION: indices are in bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.cols + col]
    }

    /// Overwrite the coefficient at `(row, col)`.
    ///
    /// PRECONDITION: indices are in bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: Complex64) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow the coefficients row-major.
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Mutably borrow the coefficients row-major.
    pub fn as_slice_mut(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Return the transposed matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Real parts, row-major.
    pub fn real(&self) -> Vec<f64> {
        self.data.iter().map(|c| c.re).collect()
    }

    /// Magnitudes, row-major.
    pub fn magnitude(&self) -> Vec<f64> {
        self.data.iter().map(|c| c.norm()).collect()
    }
}
