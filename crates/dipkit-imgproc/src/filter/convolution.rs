use dipkit_image::{Image, ImageError};

use crate::{color, parallel};

/// A rectangular integer convolution mask with odd side lengths.
///
/// The origin is the centre cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvolutionMask {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl ConvolutionMask {
    /// Build a mask from its rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the mask is empty, ragged or has an even side.
    pub fn new(rows: Vec<Vec<i32>>) -> Result<Self, ImageError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if height == 0 || width == 0 {
            return Err(ImageError::InvalidArgument("empty convolution mask".into()));
        }
        if rows.iter().any(|r| r.len() != width) {
            return Err(ImageError::InvalidArgument(
                "convolution mask rows must have equal length".into(),
            ));
        }
        if height % 2 == 0 || width % 2 == 0 {
            return Err(ImageError::InvalidArgument(format!(
                "convolution mask must have odd sides, got {width}x{height}"
            )));
        }
        Ok(Self {
            rows: height,
            cols: width,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of mask rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of mask columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Weight at `(row, col)`.
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> i32 {
        self.data[row * self.cols + col]
    }

    /// Whether the mask qualifies for the unrolled 3x3 path.
    pub fn is_3x3(&self) -> bool {
        self.rows == 3 && self.cols == 3
    }
}

fn gray_of(src: &Image<u8, 4>) -> Result<Image<u8, 1>, ImageError> {
    let mut gray = Image::<u8, 1>::from_size_val(src.size(), 0)?;
    color::gray_from_rgba(src, &mut gray)?;
    Ok(gray)
}

fn check_sizes(src: &Image<u8, 4>, dst: &Image<u8, 4>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    Ok(())
}

/// Convolve the luminance of an RGBA image with an integer mask.
///
/// The image is first reduced to 8-bit luminance, the mask is applied centred on every
/// interior pixel and the clamped result is written to all three colour channels. Pixels
/// closer to an edge than half the mask side keep their luminance unchanged. Alpha is copied.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGBA image, gray in the colour channels.
/// * `mask` - The convolution mask.
pub fn convolve(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    mask: &ConvolutionMask,
) -> Result<(), ImageError> {
    check_sizes(src, dst)?;
    let gray = gray_of(src)?;
    let (rh, rw) = (mask.rows / 2, mask.cols / 2);
    let (width, height) = (src.width(), src.height());

    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        let g = if x < rw || y < rh || x + rw >= width || y + rh >= height {
            gray.pixel(x, y)[0]
        } else {
            let mut acc = 0i32;
            for j in 0..mask.rows {
                for i in 0..mask.cols {
                    acc += mask.weight(j, i) * gray.pixel(x + i - rw, y + j - rh)[0] as i32;
                }
            }
            acc.clamp(0, 255) as u8
        };
        dst_pixel.copy_from_slice(&[g, g, g, src.pixel(x, y)[3]]);
    });

    Ok(())
}

/// Unrolled 3x3 variant of [`convolve`], used for Laplacian sharpening masks.
///
/// Produces exactly the same output as [`convolve`] for a 3x3 mask.
///
/// # Errors
///
/// Returns an error if the mask is not 3x3 or the sizes differ.
pub fn convolve_3x3(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    mask: &ConvolutionMask,
) -> Result<(), ImageError> {
    if !mask.is_3x3() {
        return Err(ImageError::InvalidArgument(format!(
            "expected a 3x3 mask, got {}x{}",
            mask.cols, mask.rows
        )));
    }
    check_sizes(src, dst)?;
    let gray = gray_of(src)?;
    let (width, height) = (src.width(), src.height());
    let g = gray.as_slice();
    let k = &mask.data;

    parallel::par_iter_pixels_indexed(dst, |x, y, dst_pixel| {
        let v = if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            g[y * width + x]
        } else {
            let up = (y - 1) * width + x;
            let mid = y * width + x;
            let down = (y + 1) * width + x;
            let acc = k[0] * g[up - 1] as i32
                + k[1] * g[up] as i32
                + k[2] * g[up + 1] as i32
                + k[3] * g[mid - 1] as i32
                + k[4] * g[mid] as i32
                + k[5] * g[mid + 1] as i32
                + k[6] * g[down - 1] as i32
                + k[7] * g[down] as i32
                + k[8] * g[down + 1] as i32;
            acc.clamp(0, 255) as u8
        };
        dst_pixel.copy_from_slice(&[v, v, v, src.pixel(x, y)[3]]);
    });

    Ok(())
}

/// Sharpen an image with a mask, taking the 3x3 fast path when possible.
pub fn sharpen(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    mask: &ConvolutionMask,
) -> Result<(), ImageError> {
    if mask.is_3x3() {
        convolve_3x3(src, dst, mask)
    } else {
        convolve(src, dst, mask)
    }
}
