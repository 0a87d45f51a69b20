#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use dipkit_image as image;

#[doc(inline)]
pub use dipkit_imgproc as imgproc;

#[doc(inline)]
pub use dipkit_io as io;

/// Command line parsing, operation catalogue and the pipeline driver.
pub mod pipeline;
