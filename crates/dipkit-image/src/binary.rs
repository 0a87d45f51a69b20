use crate::error::ImageError;
use crate::image::{Image, ImageSize};

/// A binary raster whose cells hold only `0` or `1`.
///
/// The invariant is checked once at construction so morphology can index freely.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryImage(Image<u8, 1>);

impl BinaryImage {
    /// Create a binary image from row-major cell values.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidArgument`] if any cell is neither 0 nor 1.
    pub fn new(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        if let Some(v) = data.iter().find(|&&v| v > 1) {
            return Err(ImageError::InvalidArgument(format!(
                "binary image cells must be 0 or 1, found {v}"
            )));
        }
        Ok(Self(Image::new(size, data)?))
    }

    /// Create an all-zero binary image.
    pub fn zeros(size: ImageSize) -> Self {
        Self(Image {
            size,
            data: vec![0u8; size.area()],
        })
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.0.size()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.0.width()
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.0.height()
    }

    /// Whether the cell at `(x, y)` is set.
    ///
    /// PRECONDITION: `(x, y)` lies inside the image.
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.0.as_slice()[y * self.width() + x] == 1
    }

    /// Set or clear the cell at `(x, y)`.
    ///
    /// PRECONDITION: `(x, y)` lies inside the image.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        let width = self.width();
        self.0.as_slice_mut()[y * width + x] = value as u8;
    }

    /// Borrow the cells as a row-major slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Number of set cells.
    pub fn count_ones(&self) -> usize {
        self.0.as_slice().iter().filter(|&&v| v == 1).count()
    }

    /// Borrow the underlying single channel image.
    pub fn as_image(&self) -> &Image<u8, 1> {
        &self.0
    }

    /// Consume and return the underlying single channel image.
    pub fn into_image(self) -> Image<u8, 1> {
        self.0
    }
}
