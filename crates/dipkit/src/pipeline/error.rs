use dipkit_image::ImageError;
use dipkit_io::IoError;

/// An error type for the pipeline module.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Error when the command line is malformed.
    #[error("Malformed command line: {0}")]
    Parse(String),

    /// Error when an operation name is not in the catalogue.
    #[error("Unknown operation '{0}', run with --help for the catalogue")]
    UnknownOperation(String),

    /// Error when a required operation argument is absent.
    #[error("Operation '{operation}' requires the argument -{argument}=<value>")]
    MissingArgument {
        /// The operation name.
        operation: String,
        /// The missing argument name.
        argument: String,
    },

    /// Error when an argument or configuration value is invalid.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error when a similarity metric is requested without a comparison image.
    #[error("Operation '{0}' needs a comparison image before the input image")]
    MissingComparison(String),

    /// Error raised by an image operator.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error raised while reading or writing images.
    #[error(transparent)]
    Io(#[from] IoError),
}
