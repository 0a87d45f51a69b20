use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use dipkit_imgproc::fft::FrequencyFilter;
use dipkit_imgproc::histogram::{Channel, HistogramStat};
use dipkit_imgproc::morphology::thinning_series;
use dipkit_imgproc::region_grow::{parse_seed_points, DistanceMetric};
use dipkit_imgproc::resources;

use super::{catalogue, OperationRequest, PipelineError};

/// Similarity metric computed against the comparison image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Mean square error.
    Mse,
    /// Peak mean square error.
    PeakMse,
    /// Signal to noise ratio.
    Snr,
    /// Peak signal to noise ratio.
    Psnr,
    /// Maximum absolute difference.
    MaxDifference,
}

impl Metric {
    /// Human readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Metric::Mse => "Mean square error",
            Metric::PeakMse => "Peak mean square error",
            Metric::Snr => "Signal to noise ratio [dB]",
            Metric::Psnr => "Peak signal to noise ratio [dB]",
            Metric::MaxDifference => "Maximum difference",
        }
    }
}

/// Binary morphology operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Morphology {
    /// Dilation.
    Dilation,
    /// Erosion.
    Erosion,
    /// Opening.
    Opening,
    /// Closing.
    Closing,
}

/// Ideal frequency filter without the mask variant, whose bitmap is loaded at run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectralFilter {
    /// Band pass.
    BandPass {
        /// Inner radius.
        low: f64,
        /// Outer radius.
        high: f64,
    },
    /// Low pass.
    LowPass {
        /// Cutoff radius.
        cutoff: f64,
    },
    /// High pass.
    HighPass {
        /// Cutoff radius.
        cutoff: f64,
    },
    /// Band cut.
    BandCut {
        /// Inner radius.
        low: f64,
        /// Outer radius.
        high: f64,
    },
    /// Phase modification.
    PhaseShift {
        /// Row shift.
        k: i32,
        /// Column shift.
        l: i32,
    },
}

impl SpectralFilter {
    /// The operator-level filter.
    pub fn to_filter(self) -> FrequencyFilter {
        match self {
            SpectralFilter::BandPass { low, high } => FrequencyFilter::BandPass { low, high },
            SpectralFilter::LowPass { cutoff } => FrequencyFilter::LowPass { cutoff },
            SpectralFilter::HighPass { cutoff } => FrequencyFilter::HighPass { cutoff },
            SpectralFilter::BandCut { low, high } => FrequencyFilter::BandCut { low, high },
            SpectralFilter::PhaseShift { k, l } => FrequencyFilter::PhaseShift { k, l },
        }
    }
}

/// A validated operation with typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Brightness shift in percent.
    Brightness(i32),
    /// Contrast adjustment.
    Contrast(i32),
    /// Negative.
    Negative,
    /// Horizontal flip.
    HorizontalFlip,
    /// Vertical flip.
    VerticalFlip,
    /// Diagonal flip.
    DiagonalFlip,
    /// Integer downscale.
    Shrink(i32),
    /// Integer upscale.
    Enlarge(i32),
    /// Adaptive median filter.
    AdaptiveMedian {
        /// Initial window side.
        min: i32,
        /// Largest window side.
        max: i32,
        /// Use the thread pool variant.
        parallel: bool,
    },
    /// Minimum filter with the given window side.
    MinFilter(i32),
    /// Maximum filter with the given window side.
    MaxFilter(i32),
    /// Similarity metric.
    Similarity(Metric),
    /// Histogram raster.
    Histogram(Channel),
    /// Histogram descriptor.
    Descriptor(HistogramStat, Channel),
    /// Rayleigh histogram transformation.
    Rayleigh {
        /// Lowest output intensity.
        gmin: i32,
        /// Highest output intensity.
        gmax: i32,
        /// Scale parameter.
        alpha: f64,
    },
    /// Sharpening with a named mask.
    Sharpen(String),
    /// Convolution with a named mask.
    Convolve(String),
    /// Kirsch edge detector.
    Kirsch,
    /// Morphology with a named structuring element.
    Morphology(Morphology, String),
    /// Hit-or-miss with named foreground and background elements.
    HitOrMiss {
        /// Foreground element.
        foreground: String,
        /// Background element.
        background: String,
    },
    /// Thinning with a named template series.
    Thinning(String),
    /// Seeded region growing.
    RegionGrow {
        /// Seed pixels as `[x, y]`.
        seeds: Vec<[usize; 2]>,
        /// Colour distance.
        metric: DistanceMetric,
        /// Admission threshold.
        threshold: f64,
    },
    /// Ideal frequency filter.
    Frequency {
        /// The filter.
        filter: SpectralFilter,
        /// Queue the filtered spectrum as well.
        spectrum: bool,
    },
    /// Mask gated frequency filter.
    MaskPass {
        /// Mask bitmap name, looked up in the mask directory.
        mask: String,
        /// Queue the filtered spectrum as well.
        spectrum: bool,
    },
    /// Magnitude spectrum of the input.
    Spectrum,
}

struct Args {
    operation: &'static str,
    values: BTreeMap<&'static str, String>,
}

impl Args {
    fn raw(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    fn parse<T>(&self, key: &str) -> Result<T, PipelineError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.raw(key);
        raw.trim().parse::<T>().map_err(|e| {
            PipelineError::InvalidArgument(format!(
                "--{} -{key}='{raw}': {e}",
                self.operation
            ))
        })
    }

    fn float(&self, key: &str) -> Result<f64, PipelineError> {
        let value: f64 = self.parse(key)?;
        if !value.is_finite() {
            return Err(PipelineError::InvalidArgument(format!(
                "--{} -{key} must be finite",
                self.operation
            )));
        }
        Ok(value)
    }

    fn flag(&self, key: &str) -> Result<bool, PipelineError> {
        match self.raw(key).trim() {
            "" | "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            other => Err(PipelineError::InvalidArgument(format!(
                "--{} -{key}='{other}': expected 0 or 1",
                self.operation
            ))),
        }
    }

    fn name(&self, key: &str) -> Result<String, PipelineError> {
        let raw = self.raw(key).trim();
        if raw.is_empty() {
            return Err(PipelineError::MissingArgument {
                operation: self.operation.to_string(),
                argument: key.to_string(),
            });
        }
        Ok(raw.to_string())
    }

    fn channel(&self) -> Result<Channel, PipelineError> {
        self.parse("channel")
    }
}

fn descriptor_stat(name: &str) -> Option<HistogramStat> {
    Some(match name {
        "cmean" => HistogramStat::Mean,
        "cvariance" => HistogramStat::Variance,
        "cstdev" => HistogramStat::StdDev,
        "cvarcoi" => HistogramStat::VariationI,
        "casyco" => HistogramStat::Asymmetry,
        "cflatco" => HistogramStat::Flatness,
        "cvarcoii" => HistogramStat::VariationII,
        "centropy" => HistogramStat::Entropy,
        _ => return None,
    })
}

/// Format a float argument for file names, `20` rather than `20.0`.
fn fmt_float(value: f64) -> String {
    format!("{value}")
}

impl Operation {
    /// Validate a request against the catalogue and parse its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnknownOperation`] for names outside the catalogue and
    /// [`PipelineError::InvalidArgument`] or [`PipelineError::MissingArgument`] for bad
    /// arguments.
    pub fn from_request(request: &OperationRequest) -> Result<Self, PipelineError> {
        let spec = catalogue::lookup(&request.name)
            .ok_or_else(|| PipelineError::UnknownOperation(request.name.clone()))?;
        let args = Args {
            operation: spec.name,
            values: spec.resolve(request)?,
        };

        let operation = match spec.name {
            "brightness" => Operation::Brightness(args.parse("value")?),
            "contrast" => Operation::Contrast(args.parse("value")?),
            "negative" => Operation::Negative,
            "hflip" => Operation::HorizontalFlip,
            "vflip" => Operation::VerticalFlip,
            "dflip" => Operation::DiagonalFlip,
            "shrink" => Operation::Shrink(args.parse("value")?),
            "enlarge" => Operation::Enlarge(args.parse("value")?),
            "adaptive" | "adaptive-parallel" => Operation::AdaptiveMedian {
                min: args.parse("min")?,
                max: args.parse("max")?,
                parallel: spec.name == "adaptive-parallel",
            },
            "min" => Operation::MinFilter(args.parse("value")?),
            "max" => Operation::MaxFilter(args.parse("value")?),
            "mse" => Operation::Similarity(Metric::Mse),
            "pmse" => Operation::Similarity(Metric::PeakMse),
            "snr" => Operation::Similarity(Metric::Snr),
            "psnr" => Operation::Similarity(Metric::Psnr),
            "md" => Operation::Similarity(Metric::MaxDifference),
            "histogram" => Operation::Histogram(args.channel()?),
            "hrayleigh" => Operation::Rayleigh {
                gmin: args.parse("min")?,
                gmax: args.parse("max")?,
                alpha: args.float("alpha")?,
            },
            "sedgesharp" => Operation::Sharpen(args.name("mask")?),
            "convolve" => Operation::Convolve(args.name("mask")?),
            "okirsf" => Operation::Kirsch,
            "dilation" => Operation::Morphology(Morphology::Dilation, args.name("se")?),
            "erosion" => Operation::Morphology(Morphology::Erosion, args.name("se")?),
            "opening" => Operation::Morphology(Morphology::Opening, args.name("se")?),
            "closing" => Operation::Morphology(Morphology::Closing, args.name("se")?),
            "HMT" => Operation::HitOrMiss {
                foreground: args.name("se1")?,
                background: args.name("se2")?,
            },
            "thinning" => Operation::Thinning(args.name("se")?),
            "region-grow" => Operation::RegionGrow {
                seeds: parse_seed_points(args.raw("seeds"))?,
                metric: DistanceMetric::from_index(args.parse("metric")?)?,
                threshold: args.float("threshold")?,
            },
            "bandpass" => Operation::Frequency {
                filter: SpectralFilter::BandPass {
                    low: args.float("low")?,
                    high: args.float("high")?,
                },
                spectrum: args.flag("spectrum")?,
            },
            "lowpass" => Operation::Frequency {
                filter: SpectralFilter::LowPass {
                    cutoff: args.float("cutoff")?,
                },
                spectrum: args.flag("spectrum")?,
            },
            "highpass" => Operation::Frequency {
                filter: SpectralFilter::HighPass {
                    cutoff: args.float("cutoff")?,
                },
                spectrum: args.flag("spectrum")?,
            },
            "bandcut" => Operation::Frequency {
                filter: SpectralFilter::BandCut {
                    low: args.float("low")?,
                    high: args.float("high")?,
                },
                spectrum: args.flag("spectrum")?,
            },
            "phasemod" => Operation::Frequency {
                filter: SpectralFilter::PhaseShift {
                    k: args.parse("k")?,
                    l: args.parse("l")?,
                },
                spectrum: args.flag("spectrum")?,
            },
            "maskpass" => Operation::MaskPass {
                mask: args.name("mask")?,
                spectrum: args.flag("spectrum")?,
            },
            "spectrum" => Operation::Spectrum,
            name => match descriptor_stat(name) {
                Some(stat) => Operation::Descriptor(stat, args.channel()?),
                None => return Err(PipelineError::UnknownOperation(name.to_string())),
            },
        };

        operation.check_parameters()?;
        Ok(operation)
    }

    /// Range checks that do not need the image.
    fn check_parameters(&self) -> Result<(), PipelineError> {
        let invalid = |msg: String| Err(PipelineError::InvalidArgument(msg));
        match self {
            Operation::Brightness(v) if !(-100..=100).contains(v) => {
                invalid(format!("brightness must be in [-100, 100], got {v}"))
            }
            Operation::Contrast(v) if !(-255..=255).contains(v) => {
                invalid(format!("contrast must be in [-255, 255], got {v}"))
            }
            Operation::Shrink(f) | Operation::Enlarge(f) if *f < 1 => {
                invalid(format!("scale factor must be >= 1, got {f}"))
            }
            Operation::AdaptiveMedian { min, max, .. } if min > max => {
                invalid(format!("adaptive window min {min} exceeds max {max}"))
            }
            Operation::RegionGrow { threshold, .. } if *threshold < 0.0 => {
                invalid(format!("region threshold must be >= 0, got {threshold}"))
            }
            Operation::Rayleigh { gmin, gmax, alpha } => {
                if !(0 <= *gmin && gmin < gmax && *gmax <= 255) {
                    invalid(format!(
                        "rayleigh bounds must satisfy 0 <= min < max <= 255, got {gmin} {gmax}"
                    ))
                } else if *alpha <= 0.0 {
                    invalid(format!("rayleigh alpha must be positive, got {alpha}"))
                } else {
                    Ok(())
                }
            }
            Operation::Frequency { filter, .. } => {
                filter.to_filter().validate()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Check that every named mask, structuring element and template series exists.
    ///
    /// Must run after any resource reload.
    pub fn check_resources(&self) -> Result<(), PipelineError> {
        match self {
            Operation::Sharpen(mask) | Operation::Convolve(mask) => {
                resources::mask(mask)?;
            }
            Operation::Morphology(_, se) => {
                resources::structuring_element(se)?;
            }
            Operation::HitOrMiss {
                foreground,
                background,
            } => {
                resources::structuring_element(foreground)?;
                resources::structuring_element(background)?;
            }
            Operation::Thinning(series) => {
                thinning_series(series)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Catalogue name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Brightness(_) => "brightness",
            Operation::Contrast(_) => "contrast",
            Operation::Negative => "negative",
            Operation::HorizontalFlip => "hflip",
            Operation::VerticalFlip => "vflip",
            Operation::DiagonalFlip => "dflip",
            Operation::Shrink(_) => "shrink",
            Operation::Enlarge(_) => "enlarge",
            Operation::AdaptiveMedian { parallel: false, .. } => "adaptive",
            Operation::AdaptiveMedian { parallel: true, .. } => "adaptive-parallel",
            Operation::MinFilter(_) => "min",
            Operation::MaxFilter(_) => "max",
            Operation::Similarity(Metric::Mse) => "mse",
            Operation::Similarity(Metric::PeakMse) => "pmse",
            Operation::Similarity(Metric::Snr) => "snr",
            Operation::Similarity(Metric::Psnr) => "psnr",
            Operation::Similarity(Metric::MaxDifference) => "md",
            Operation::Histogram(_) => "histogram",
            Operation::Descriptor(stat, _) => match stat {
                HistogramStat::Mean => "cmean",
                HistogramStat::Variance => "cvariance",
                HistogramStat::StdDev => "cstdev",
                HistogramStat::VariationI => "cvarcoi",
                HistogramStat::Asymmetry => "casyco",
                HistogramStat::Flatness => "cflatco",
                HistogramStat::VariationII => "cvarcoii",
                HistogramStat::Entropy => "centropy",
            },
            Operation::Rayleigh { .. } => "hrayleigh",
            Operation::Sharpen(_) => "sedgesharp",
            Operation::Convolve(_) => "convolve",
            Operation::Kirsch => "okirsf",
            Operation::Morphology(Morphology::Dilation, _) => "dilation",
            Operation::Morphology(Morphology::Erosion, _) => "erosion",
            Operation::Morphology(Morphology::Opening, _) => "opening",
            Operation::Morphology(Morphology::Closing, _) => "closing",
            Operation::HitOrMiss { .. } => "HMT",
            Operation::Thinning(_) => "thinning",
            Operation::RegionGrow { .. } => "region-grow",
            Operation::Frequency { filter, .. } => match filter {
                SpectralFilter::BandPass { .. } => "bandpass",
                SpectralFilter::LowPass { .. } => "lowpass",
                SpectralFilter::HighPass { .. } => "highpass",
                SpectralFilter::BandCut { .. } => "bandcut",
                SpectralFilter::PhaseShift { .. } => "phasemod",
            },
            Operation::MaskPass { .. } => "maskpass",
            Operation::Spectrum => "spectrum",
        }
    }

    /// File name descriptor `<op>[_<params>]`, stable for equal parameters.
    pub fn descriptor(&self) -> String {
        let params: Vec<String> = match self {
            Operation::Brightness(v)
            | Operation::Contrast(v)
            | Operation::Shrink(v)
            | Operation::Enlarge(v)
            | Operation::MinFilter(v)
            | Operation::MaxFilter(v) => vec![v.to_string()],
            Operation::AdaptiveMedian { min, max, .. } => vec![min.to_string(), max.to_string()],
            Operation::Histogram(channel) | Operation::Descriptor(_, channel) => {
                vec![channel.name().to_string()]
            }
            Operation::Rayleigh { gmin, gmax, alpha } => {
                vec![gmin.to_string(), gmax.to_string(), fmt_float(*alpha)]
            }
            Operation::Sharpen(name) | Operation::Convolve(name) | Operation::Thinning(name) => {
                vec![name.clone()]
            }
            Operation::Morphology(_, se) => vec![se.clone()],
            Operation::HitOrMiss {
                foreground,
                background,
            } => vec![foreground.clone(), background.clone()],
            Operation::RegionGrow {
                seeds,
                metric,
                threshold,
            } => vec![
                seeds.len().to_string(),
                format!("{metric:?}").to_lowercase(),
                fmt_float(*threshold),
            ],
            Operation::Frequency { filter, .. } => match filter {
                SpectralFilter::BandPass { low, high } | SpectralFilter::BandCut { low, high } => {
                    vec![fmt_float(*low), fmt_float(*high)]
                }
                SpectralFilter::LowPass { cutoff } | SpectralFilter::HighPass { cutoff } => {
                    vec![fmt_float(*cutoff)]
                }
                SpectralFilter::PhaseShift { k, l } => vec![k.to_string(), l.to_string()],
            },
            Operation::MaskPass { mask, .. } => vec![mask.clone()],
            _ => Vec::new(),
        };
        std::iter::once(self.name().to_string())
            .chain(params)
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Human readable description for the execution report.
    pub fn description(&self) -> String {
        match self {
            Operation::Brightness(v) => format!("Brightness {v:+}%"),
            Operation::Contrast(v) => format!("Contrast {v:+}"),
            Operation::Negative => "Negative".to_string(),
            Operation::HorizontalFlip => "Horizontal flip".to_string(),
            Operation::VerticalFlip => "Vertical flip".to_string(),
            Operation::DiagonalFlip => "Diagonal flip".to_string(),
            Operation::Shrink(f) => format!("Shrink by {f}"),
            Operation::Enlarge(f) => format!("Enlarge by {f}"),
            Operation::AdaptiveMedian { min, max, parallel } => format!(
                "Adaptive median filter {min}..{max}{}",
                if *parallel { " (parallel)" } else { "" }
            ),
            Operation::MinFilter(side) => format!("Minimum filter {side}x{side}"),
            Operation::MaxFilter(side) => format!("Maximum filter {side}x{side}"),
            Operation::Similarity(metric) => metric.description().to_string(),
            Operation::Histogram(channel) => format!("Histogram of channel {}", channel.name()),
            Operation::Descriptor(stat, channel) => {
                format!("{} of channel {}", stat.description(), channel.name())
            }
            Operation::Rayleigh { gmin, gmax, alpha } => {
                format!("Rayleigh transformation [{gmin}, {gmax}] alpha {alpha}")
            }
            Operation::Sharpen(mask) => format!("Edge sharpening with mask {mask}"),
            Operation::Convolve(mask) => format!("Convolution with mask {mask}"),
            Operation::Kirsch => "Kirsch edge detection".to_string(),
            Operation::Morphology(op, se) => format!("{op:?} with element {se}"),
            Operation::HitOrMiss {
                foreground,
                background,
            } => format!("Hit-or-miss with elements {foreground}, {background}"),
            Operation::Thinning(series) => format!("Thinning with series {series}"),
            Operation::RegionGrow {
                seeds,
                metric,
                threshold,
            } => format!(
                "Region growing from {} seeds, {metric:?} distance <= {threshold}",
                seeds.len()
            ),
            Operation::Frequency { filter, .. } => match filter {
                SpectralFilter::BandPass { low, high } => format!("Band pass [{low}, {high}]"),
                SpectralFilter::LowPass { cutoff } => format!("Low pass {cutoff}"),
                SpectralFilter::HighPass { cutoff } => format!("High pass {cutoff}"),
                SpectralFilter::BandCut { low, high } => format!("Band cut [{low}, {high}]"),
                SpectralFilter::PhaseShift { k, l } => format!("Phase modification k={k} l={l}"),
            },
            Operation::MaskPass { mask, .. } => format!("Mask pass with {mask}"),
            Operation::Spectrum => "Magnitude spectrum".to_string(),
        }
    }

    /// Whether the produced image counts as a denoised artefact.
    pub fn is_denoising(&self) -> bool {
        matches!(
            self,
            Operation::AdaptiveMedian { .. } | Operation::MinFilter(_) | Operation::MaxFilter(_)
        )
    }
}
