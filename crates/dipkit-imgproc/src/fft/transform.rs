use std::f64::consts::PI;

use dipkit_image::{Complex2D, ImageError};
use num_complex::Complex64;
use rayon::prelude::*;

fn fft_recursive(data: &mut [Complex64], inverse: bool) {
    let n = data.len();
    if n <= 1 {
        return;
    }

    let mut even: Vec<Complex64> = data.iter().step_by(2).copied().collect();
    let mut odd: Vec<Complex64> = data.iter().skip(1).step_by(2).copied().collect();
    fft_recursive(&mut even, inverse);
    fft_recursive(&mut odd, inverse);

    let sign = if inverse { 1.0 } else { -1.0 };
    let half = n / 2;
    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, sign * 2.0 * PI * k as f64 / n as f64);
        let t = twiddle * odd[k];
        data[k] = even[k] + t;
        data[k + half] = even[k] - t;
        if inverse {
            data[k] /= 2.0;
            data[k + half] /= 2.0;
        }
    }
}

/// In-place one-dimensional radix-2 FFT.
///
/// # Arguments
///
/// * `data` - The samples, overwritten with their transform.
/// * `inverse` - Run the inverse transform, scaled by `1/N`.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedSize`] if the length is not a power of two.
pub fn fft1d(data: &mut [Complex64], inverse: bool) -> Result<(), ImageError> {
    if !data.len().is_power_of_two() {
        return Err(ImageError::UnsupportedSize(data.len(), 1));
    }
    fft_recursive(data, inverse);
    Ok(())
}

/// In-place two-dimensional FFT.
///
/// Every row is transformed, the matrix is transposed, the rows of the transpose (the original
/// columns) are transformed and the matrix is transposed back. Rows are processed on the rayon
/// pool.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedSize`] if either dimension is not a power of two.
pub fn fft2d(matrix: &mut Complex2D, inverse: bool) -> Result<(), ImageError> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    if !rows.is_power_of_two() || !cols.is_power_of_two() {
        return Err(ImageError::UnsupportedSize(cols, rows));
    }
    log::debug!("fft2d {cols}x{rows} inverse={inverse}");

    matrix
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .for_each(|row| fft_recursive(row, inverse));

    let mut transposed = matrix.transpose();
    transposed
        .as_slice_mut()
        .par_chunks_exact_mut(rows)
        .for_each(|row| fft_recursive(row, inverse));

    *matrix = transposed.transpose();
    Ok(())
}

fn roll(matrix: &Complex2D, shift_rows: usize, shift_cols: usize) -> Complex2D {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    let mut out = Complex2D::zeros(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            out.set((r + shift_rows) % rows, (c + shift_cols) % cols, matrix.get(r, c));
        }
    }
    out
}

/// Swap the quadrants diagonally so the DC term moves from `[0, 0]` to the centre.
///
/// Both axes are rolled by half their length, rounded down.
pub fn quadrant_swap(matrix: &mut Complex2D) {
    if matrix.size().area() == 0 {
        return;
    }
    *matrix = roll(matrix, matrix.rows() / 2, matrix.cols() / 2);
}

/// Undo [`quadrant_swap`]. Identical to it for even dimensions.
pub fn inverse_quadrant_swap(matrix: &mut Complex2D) {
    if matrix.size().area() == 0 {
        return;
    }
    *matrix = roll(matrix, matrix.rows().div_ceil(2), matrix.cols().div_ceil(2));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fft1d_constant_signal() -> Result<(), ImageError> {
        let mut data = vec![Complex64::new(10.0, 0.0); 4];
        fft1d(&mut data, false)?;
        assert_abs_diff_eq!(data[0].re, 40.0, epsilon = 1e-12);
        for c in &data[1..] {
            assert_abs_diff_eq!(c.norm(), 0.0, epsilon = 1e-12);
        }
        fft1d(&mut data, true)?;
        for c in &data {
            assert_abs_diff_eq!(c.re, 10.0, epsilon = 1e-12);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn fft1d_matches_dft() -> Result<(), ImageError> {
        let input: Vec<Complex64> = [1.0, 2.0, 0.0, -1.0, 3.0, 0.5, -2.0, 4.0]
            .iter()
            .map(|&v| Complex64::new(v, 0.0))
            .collect();
        let mut data = input.clone();
        fft1d(&mut data, false)?;
        let n = input.len();
        for (k, coefficient) in data.iter().enumerate() {
            let expected: Complex64 = input
                .iter()
                .enumerate()
                .map(|(t, x)| x * Complex64::from_polar(1.0, -2.0 * PI * (k * t) as f64 / n as f64))
                .sum();
            assert_abs_diff_eq!(coefficient.re, expected.re, epsilon = 1e-9);
            assert_abs_diff_eq!(coefficient.im, expected.im, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn fft_rejects_non_power_of_two() {
        let mut data = vec![Complex64::new(0.0, 0.0); 6];
        assert_eq!(fft1d(&mut data, false), Err(ImageError::UnsupportedSize(6, 1)));
        let mut matrix = Complex2D::zeros(300, 300);
        assert_eq!(
            fft2d(&mut matrix, false),
            Err(ImageError::UnsupportedSize(300, 300))
        );
    }

    #[test]
    fn fft2d_round_trip() -> Result<(), ImageError> {
        let (rows, cols) = (8, 16);
        let samples: Vec<f64> = (0..rows * cols).map(|i| ((i * 37) % 251) as f64).collect();
        let mut matrix = Complex2D::from_real(rows, cols, &samples)?;
        fft2d(&mut matrix, false)?;
        assert_abs_diff_eq!(matrix.get(0, 0).re, samples.iter().sum::<f64>(), epsilon = 1e-6);
        fft2d(&mut matrix, true)?;
        for (value, expected) in matrix.as_slice().iter().zip(&samples) {
            assert_abs_diff_eq!(value.re, *expected, epsilon = 1e-6);
            assert_abs_diff_eq!(value.im, 0.0, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn quadrant_swap_moves_dc_to_centre() -> Result<(), ImageError> {
        let mut matrix = Complex2D::from_real(4, 4, &(0..16).map(f64::from).collect::<Vec<_>>())?;
        let original = matrix.clone();
        quadrant_swap(&mut matrix);
        assert_eq!(matrix.get(2, 2), original.get(0, 0));
        assert_eq!(matrix.get(0, 0), original.get(2, 2));
        assert_eq!(matrix.get(3, 1), original.get(1, 3));
        inverse_quadrant_swap(&mut matrix);
        assert_eq!(matrix, original);
        Ok(())
    }

    #[test]
    fn quadrant_swap_odd_size() -> Result<(), ImageError> {
        let mut matrix = Complex2D::from_real(1, 3, &[0.0, 1.0, 2.0])?;
        quadrant_swap(&mut matrix);
        assert_eq!(matrix.real(), vec![2.0, 0.0, 1.0]);
        inverse_quadrant_swap(&mut matrix);
        assert_eq!(matrix.real(), vec![0.0, 1.0, 2.0]);
        Ok(())
    }
}
