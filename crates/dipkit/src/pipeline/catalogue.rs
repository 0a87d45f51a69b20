use std::collections::BTreeMap;
use std::fmt::Write;

use super::{OperationRequest, PipelineError};

/// An argument accepted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    /// Argument name, given as `-name=value`.
    pub name: &'static str,
    /// Value used when the argument is omitted; `None` marks a required argument.
    pub default: Option<&'static str>,
}

/// A catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    /// Operation name, given as `--name`.
    pub name: &'static str,
    /// Accepted arguments.
    pub args: &'static [ArgumentSpec],
    /// One line summary shown by `--help`.
    pub summary: &'static str,
}

const fn required(name: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        default: None,
    }
}

const fn optional(name: &'static str, default: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        default: Some(default),
    }
}

const fn op(
    name: &'static str,
    args: &'static [ArgumentSpec],
    summary: &'static str,
) -> OperationSpec {
    OperationSpec {
        name,
        args,
        summary,
    }
}

const CHANNEL: ArgumentSpec = optional("channel", "luma");
const SPECTRUM: ArgumentSpec = optional("spectrum", "0");

/// Every operation understood by the pipeline, in help order.
pub const CATALOGUE: &[OperationSpec] = &[
    op("brightness", &[required("value")], "shift every channel by value% of 255, value in [-100, 100]"),
    op("contrast", &[required("value")], "scale channels around 128, value in [-255, 255]"),
    op("negative", &[], "invert every channel"),
    op("hflip", &[], "mirror columns"),
    op("vflip", &[], "mirror rows"),
    op("dflip", &[], "rotate 180 degrees and swap width with height"),
    op("shrink", &[required("value")], "nearest neighbour downscale by an integer factor"),
    op("enlarge", &[required("value")], "nearest neighbour upscale by an integer factor"),
    op(
        "adaptive",
        &[optional("min", "3"), optional("max", "7")],
        "adaptive median filter, channels must agree on the window size (denoising)",
    ),
    op(
        "adaptive-parallel",
        &[optional("min", "3"), optional("max", "7")],
        "adaptive median filter on the thread pool, channels grow independently (denoising)",
    ),
    op("min", &[required("value")], "minimum filter with an odd window side (denoising)"),
    op("max", &[required("value")], "maximum filter with an odd window side (denoising)"),
    op("mse", &[], "mean square error against the comparison image"),
    op("pmse", &[], "peak mean square error against the comparison image"),
    op("snr", &[], "signal to noise ratio in dB against the comparison image"),
    op("psnr", &[], "peak signal to noise ratio in dB against the comparison image"),
    op("md", &[], "maximum absolute channel difference against the comparison image"),
    op("histogram", &[CHANNEL], "render the histogram of channel r, g, b or luma"),
    op("cmean", &[CHANNEL], "histogram mean"),
    op("cvariance", &[CHANNEL], "histogram variance"),
    op("cstdev", &[CHANNEL], "histogram standard deviation"),
    op("cvarcoi", &[CHANNEL], "histogram variation coefficient I"),
    op("casyco", &[CHANNEL], "histogram asymmetry coefficient"),
    op("cflatco", &[CHANNEL], "histogram flattening coefficient"),
    op("cvarcoii", &[CHANNEL], "histogram variation coefficient II"),
    op("centropy", &[CHANNEL], "histogram information source entropy"),
    op(
        "hrayleigh",
        &[optional("min", "0"), optional("max", "255"), optional("alpha", "100")],
        "Rayleigh histogram transformation of the luminance",
    ),
    op(
        "sedgesharp",
        &[optional("mask", "edge1")],
        "sharpen with a named mask, 3x3 masks take the fast path; output is gray",
    ),
    op("convolve", &[required("mask")], "convolve the luminance with a named mask; output is gray"),
    op("okirsf", &[], "Kirsch compass edge detector on the HSV value"),
    op("dilation", &[required("se")], "binary dilation with a named structuring element"),
    op(
        "erosion",
        &[required("se")],
        "binary erosion; element cells outside the image are ignored, so regions erode into the border",
    ),
    op("opening", &[required("se")], "erosion followed by dilation"),
    op("closing", &[required("se")], "dilation followed by erosion"),
    op("HMT", &[required("se1"), required("se2")], "hit-or-miss with foreground se1 and background se2"),
    op("thinning", &[optional("se", "xii")], "thin to a skeleton with template series xi or xii"),
    op(
        "region-grow",
        &[required("seeds"), optional("metric", "0"), optional("threshold", "20")],
        "grow regions from seeds [x,y][x,y]..., metric 0 euclidean 1 manhattan 2 chebyshev",
    ),
    op("bandpass", &[required("low"), required("high"), SPECTRUM], "keep radii in [low, high]"),
    op("lowpass", &[required("cutoff"), SPECTRUM], "keep radii up to cutoff"),
    op("highpass", &[required("cutoff"), SPECTRUM], "keep radii from cutoff"),
    op("bandcut", &[required("low"), required("high"), SPECTRUM], "reject radii in [low, high]"),
    op("phasemod", &[required("k"), required("l"), SPECTRUM], "shift the image by k rows and l columns"),
    op("maskpass", &[required("mask"), SPECTRUM], "zero the spectrum where the mask bitmap is black"),
    op("spectrum", &[], "render the centred magnitude spectrum"),
];

/// Find an operation by name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static OperationSpec> {
    CATALOGUE.iter().find(|spec| spec.name.eq_ignore_ascii_case(name))
}

impl OperationSpec {
    /// Check the request arguments against this entry and fill in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidArgument`] for arguments the operation does not take
    /// and [`PipelineError::MissingArgument`] for absent required ones.
    pub fn resolve(
        &self,
        request: &OperationRequest,
    ) -> Result<BTreeMap<&'static str, String>, PipelineError> {
        if let Some(unknown) = request
            .args
            .keys()
            .find(|key| !self.args.iter().any(|arg| arg.name == key.as_str()))
        {
            return Err(PipelineError::InvalidArgument(format!(
                "operation '{}' does not take the argument -{unknown}",
                self.name
            )));
        }

        self.args
            .iter()
            .map(|arg| {
                let value = match (request.args.get(arg.name), arg.default) {
                    (Some(value), _) => value.clone(),
                    (None, Some(default)) => default.to_string(),
                    (None, None) => {
                        return Err(PipelineError::MissingArgument {
                            operation: self.name.to_string(),
                            argument: arg.name.to_string(),
                        })
                    }
                };
                Ok((arg.name, value))
            })
            .collect()
    }

    /// Usage line, e.g. `--adaptive [-min=3] [-max=7]`.
    pub fn usage(&self) -> String {
        self.args.iter().fold(format!("--{}", self.name), |mut acc, arg| {
            let _ = match arg.default {
                Some(default) => write!(acc, " [-{}={default}]", arg.name),
                None => write!(acc, " -{}=<value>", arg.name),
            };
            acc
        })
    }
}

/// Text printed by `--help`.
pub fn help_text() -> String {
    let mut text = String::from(
        "usage: dipkit --op [-key=value]... [--op ...] [comparison.bmp] input.bmp\n\n\
         Operations run in order on the input image; produced images are written at the end\n\
         as <input>_<op>[_<params>].bmp. Binary operations threshold the luminance at 128.\n\n",
    );
    let width = CATALOGUE
        .iter()
        .map(|spec| spec.usage().len())
        .max()
        .unwrap_or(0);
    for spec in CATALOGUE {
        let _ = writeln!(text, "  {:<width$}  {}", spec.usage(), spec.summary);
    }
    text
}
