//! The pipeline turns a command line into a sequence of operations over one input image.
//!
//! ```text
//! dipkit --adaptive -min=3 -max=7 --psnr noisy.bmp clean.bmp
//! ```
//!
//! [`parse_args`] splits the tokens into [`OperationRequest`]s, [`Operation::from_request`]
//! validates them against the [`catalogue`], and [`run`] executes them in order, queueing
//! every produced image as an [`Artefact`] that is written once the last operation succeeds.

mod artefact;
pub use artefact::{Artefact, ArtefactKind, ArtefactQueue};

/// The operation catalogue shown by `--help`.
pub mod catalogue;

mod config;
pub use config::*;

mod driver;
pub use driver::{run, NamedImage, Pipeline, BINARY_THRESHOLD};

mod error;
pub use error::PipelineError;

mod operation;
pub use operation::{Metric, Morphology, Operation, SpectralFilter};

mod report;
pub use report::{ComparisonEntry, ExecutionReport, ReportEntry};

mod request;
pub use request::{parse_args, Invocation, OperationRequest};
