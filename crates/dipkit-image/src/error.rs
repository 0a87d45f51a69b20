/// An error type for the image and image processing modules.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must share a size do not.
    #[error("Image size mismatch: ({0}x{1}) vs ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when a scalar argument is out of its allowed range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error when a transform does not support the image dimensions.
    #[error("Unsupported size {0}x{1}: both dimensions must be powers of two")]
    UnsupportedSize(usize, usize),

    /// Error when a named mask or structuring element does not exist.
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// Error when the input carries no information for the requested quantity.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds ({1} channels)")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),
}
