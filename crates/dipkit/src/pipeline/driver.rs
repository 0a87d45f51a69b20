use std::path::Path;
use std::time::Instant;

use dipkit_image::{BinaryImage, Image, ImageError, ImageSize};
use dipkit_imgproc::color::{binary_from_rgba, gray_from_rgba, rgba_from_binary};
use dipkit_imgproc::enhance::{adjust_brightness, adjust_contrast, negative};
use dipkit_imgproc::fft::{frequency_filter, magnitude_spectrum, spectrum_of, FrequencyFilter};
use dipkit_imgproc::filter::{
    adaptive_median_filter, adaptive_median_filter_parallel, convolve, kirsch, max_filter,
    min_filter, sharpen,
};
use dipkit_imgproc::flip::{diagonal_flip, horizontal_flip, vertical_flip};
use dipkit_imgproc::histogram::{rayleigh, render_histogram, Channel, Histogram};
use dipkit_imgproc::metrics::{max_difference, mse, peak_mse, psnr, snr};
use dipkit_imgproc::morphology::{close, dilate, erode, hit_or_miss, open, thin, thinning_series};
use dipkit_imgproc::region_grow::{region_grow, RegionGrowParams};
use dipkit_imgproc::resize::{enlarge, enlarged_size, shrink, shrunk_size};
use dipkit_imgproc::resources;
use dipkit_io::read_image_bmp;

use super::{
    ArtefactKind, ArtefactQueue, ComparisonEntry, ExecutionReport, Invocation, Metric,
    Morphology, Operation, PipelineConfig, PipelineError, ReportEntry,
};

/// Luminance at or above which a pixel belongs to the binary foreground.
pub const BINARY_THRESHOLD: u8 = 128;

/// An image loaded from disk with the name reports refer to it by.
#[derive(Debug, Clone)]
pub struct NamedImage {
    /// Pixels.
    pub image: Image<u8, 4>,
    /// File name.
    pub name: String,
}

impl NamedImage {
    /// Load a BMP file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let image = read_image_bmp(path)?;
        log::info!(
            "loaded {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self {
            image,
            name: file_name(path),
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Sequential executor holding the input image, the comparison image and the artefact queue.
pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    input: NamedImage,
    comparison: Option<NamedImage>,
    queue: ArtefactQueue,
    report: ExecutionReport,
    started: Instant,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over already loaded images.
    pub fn new(
        config: &'a PipelineConfig,
        input: NamedImage,
        comparison: Option<NamedImage>,
    ) -> Self {
        Self {
            config,
            input,
            comparison,
            queue: ArtefactQueue::new(),
            report: ExecutionReport::default(),
            started: Instant::now(),
        }
    }

    /// The artefacts queued so far.
    pub fn queue(&self) -> &ArtefactQueue {
        &self.queue
    }

    /// The report entries recorded so far.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.report.entries
    }

    /// Run one operation and record its outcome.
    pub fn execute(&mut self, op: &Operation) -> Result<(), PipelineError> {
        log::info!("running {}", op.descriptor());
        let start = Instant::now();
        let result = self.apply(op)?;
        let duration = start.elapsed();
        log::debug!("{} took {:?}", op.name(), duration);
        self.report.entries.push(ReportEntry {
            name: op.name().to_string(),
            description: op.description(),
            result,
            duration,
        });
        Ok(())
    }

    /// Write every artefact and return the report.
    pub fn finish(self) -> Result<ExecutionReport, PipelineError> {
        let mut report = self.report;
        report.written = self.queue.write_all(&self.config.output_dir)?;
        report.total = self.started.elapsed();
        Ok(report)
    }

    fn base(&self) -> &str {
        file_stem(&self.input.name)
    }

    fn filename(&self, descriptor: &str) -> String {
        format!("{}_{descriptor}.bmp", self.base())
    }

    /// Allocate an output of `size`, fill it from the input and queue it.
    fn produce<R>(
        &mut self,
        op: &Operation,
        size: ImageSize,
        kind: ArtefactKind,
        f: impl FnOnce(&Image<u8, 4>, &mut Image<u8, 4>) -> Result<R, ImageError>,
    ) -> Result<R, PipelineError> {
        let mut dst = Image::from_size_val(size, 0)?;
        let out = f(&self.input.image, &mut dst)?;
        let filename = self.filename(&op.descriptor());
        self.queue.push(dst, filename, kind);
        Ok(out)
    }

    /// Threshold the input, run a binary operator and queue the result as RGBA.
    fn produce_binary<R>(
        &mut self,
        op: &Operation,
        f: impl FnOnce(&BinaryImage, &mut BinaryImage) -> Result<R, ImageError>,
    ) -> Result<R, PipelineError> {
        let size = self.input.image.size();
        self.produce(op, size, ArtefactKind::Processed, |src, dst| {
            let set = binary_from_rgba(src, BINARY_THRESHOLD)?;
            let mut out = BinaryImage::zeros(size);
            let res = f(&set, &mut out)?;
            rgba_from_binary(&out, dst)?;
            Ok(res)
        })
    }

    fn apply(&mut self, op: &Operation) -> Result<Option<String>, PipelineError> {
        use ArtefactKind::{Denoised, Processed, Rayleigh};

        let size = self.input.image.size();
        match op {
            Operation::Brightness(v) => {
                self.produce(op, size, Processed, |s, d| adjust_brightness(s, d, *v))?
            }
            Operation::Contrast(v) => {
                self.produce(op, size, Processed, |s, d| adjust_contrast(s, d, *v))?
            }
            Operation::Negative => self.produce(op, size, Processed, negative)?,
            Operation::HorizontalFlip => self.produce(op, size, Processed, horizontal_flip)?,
            Operation::VerticalFlip => self.produce(op, size, Processed, vertical_flip)?,
            Operation::DiagonalFlip => {
                self.produce(op, size.transposed(), Processed, diagonal_flip)?
            }
            Operation::Shrink(f) => {
                let out = shrunk_size(size, *f)?;
                self.produce(op, out, Processed, |s, d| shrink(s, d, *f))?
            }
            Operation::Enlarge(f) => {
                let out = enlarged_size(size, *f)?;
                self.produce(op, out, Processed, |s, d| enlarge(s, d, *f))?
            }
            Operation::AdaptiveMedian { min, max, parallel } => {
                self.produce(op, size, Denoised, |s, d| {
                    if *parallel {
                        adaptive_median_filter_parallel(s, d, *min, *max)
                    } else {
                        adaptive_median_filter(s, d, *min, *max)
                    }
                })?
            }
            Operation::MinFilter(side) => {
                self.produce(op, size, Denoised, |s, d| min_filter(s, d, *side))?
            }
            Operation::MaxFilter(side) => {
                self.produce(op, size, Denoised, |s, d| max_filter(s, d, *side))?
            }
            Operation::Similarity(metric) => return self.compare(op, *metric).map(Some),
            Operation::Histogram(channel) => self.histogram(*channel)?,
            Operation::Descriptor(stat, channel) => {
                let source = self
                    .queue
                    .earliest_non_histogram()
                    .map_or(&self.input.image, |a| &a.image);
                let value = stat.evaluate(&Histogram::from_image(source, *channel))?;
                return Ok(Some(format!("{value:.6}")));
            }
            Operation::Rayleigh { gmin, gmax, alpha } => {
                self.produce(op, size, Rayleigh, |s, d| rayleigh(s, d, *gmin, *gmax, *alpha))?
            }
            Operation::Sharpen(name) => {
                let mask = resources::mask(name)?;
                self.produce(op, size, Processed, |s, d| sharpen(s, d, &mask))?
            }
            Operation::Convolve(name) => {
                let mask = resources::mask(name)?;
                self.produce(op, size, Processed, |s, d| convolve(s, d, &mask))?
            }
            Operation::Kirsch => self.produce(op, size, Processed, kirsch)?,
            Operation::Morphology(kind, name) => {
                let se = resources::structuring_element(name)?;
                self.produce_binary(op, |a, out| match kind {
                    Morphology::Dilation => dilate(a, out, &se),
                    Morphology::Erosion => erode(a, out, &se),
                    Morphology::Opening => open(a, out, &se),
                    Morphology::Closing => close(a, out, &se),
                })?
            }
            Operation::HitOrMiss {
                foreground,
                background,
            } => {
                let fg = resources::structuring_element(foreground)?;
                let bg = resources::structuring_element(background)?;
                self.produce_binary(op, |a, out| hit_or_miss(a, out, &fg, &bg))?
            }
            Operation::Thinning(name) => {
                let series = thinning_series(name)?;
                let passes = self.produce_binary(op, |a, out| thin(a, out, series))?;
                return Ok(Some(format!("{passes} passes")));
            }
            Operation::RegionGrow {
                seeds,
                metric,
                threshold,
            } => {
                let params = RegionGrowParams {
                    metric: *metric,
                    threshold: *threshold,
                    random_seed: self.config.seed,
                };
                let regions =
                    self.produce(op, size, Processed, |s, d| region_grow(s, d, seeds, &params))?;
                return Ok(Some(format!("{regions} regions")));
            }
            Operation::Frequency { filter, spectrum } => {
                self.frequency(op, &filter.to_filter(), *spectrum)?
            }
            Operation::MaskPass { mask, spectrum } => {
                let path = self.config.mask_dir.join(format!("{mask}.bmp"));
                let bitmap = read_image_bmp(&path)?;
                let mut gray = Image::from_size_val(bitmap.size(), 0)?;
                gray_from_rgba(&bitmap, &mut gray)?;
                self.frequency(op, &FrequencyFilter::Mask(gray), *spectrum)?
            }
            Operation::Spectrum => {
                let spectrum = spectrum_of(&self.input.image)?;
                let mut img = Image::from_size_val(spectrum.size(), 0)?;
                magnitude_spectrum(&spectrum, &mut img)?;
                let filename = self.filename(&op.descriptor());
                self.queue.push(img, filename, ArtefactKind::Spectrum);
            }
        }
        Ok(None)
    }

    fn frequency(
        &mut self,
        op: &Operation,
        filter: &FrequencyFilter,
        with_spectrum: bool,
    ) -> Result<(), PipelineError> {
        let size = self.input.image.size();
        let centred = self.produce(op, size, ArtefactKind::Processed, |s, d| {
            frequency_filter(s, d, filter)
        })?;
        if with_spectrum {
            let mut img = Image::from_size_val(centred.size(), 0)?;
            magnitude_spectrum(&centred, &mut img)?;
            let filename = self.filename(&format!("{}_spectrum", op.descriptor()));
            self.queue.push(img, filename, ArtefactKind::Spectrum);
        }
        Ok(())
    }

    /// Raster the input histogram, and the histogram of the latest Rayleigh output if any.
    fn histogram(&mut self, channel: Channel) -> Result<(), PipelineError> {
        let raster = render_histogram(
            &Histogram::from_image(&self.input.image, channel),
            channel.bar_color(),
        )?;
        let post = match self.queue.latest_rayleigh() {
            Some(artefact) => Some((
                render_histogram(
                    &Histogram::from_image(&artefact.image, channel),
                    channel.bar_color(),
                )?,
                format!("{}_histogram_{}.bmp", artefact.stem(), channel.name()),
            )),
            None => None,
        };

        let filename = self.filename(&format!("histogram_{}", channel.name()));
        self.queue.push(raster, filename, ArtefactKind::Histogram);
        if let Some((raster, filename)) = post {
            self.queue.push(raster, filename, ArtefactKind::Histogram);
        }
        Ok(())
    }

    fn compare(&mut self, op: &Operation, metric: Metric) -> Result<String, PipelineError> {
        let reference = self
            .comparison
            .as_ref()
            .ok_or_else(|| PipelineError::MissingComparison(op.name().to_string()))?;
        let (candidate, candidate_name) = match self.queue.latest_denoised() {
            Some(artefact) => {
                log::warn!(
                    "{}: comparing the denoised {} instead of {}",
                    op.name(),
                    artefact.filename,
                    self.input.name
                );
                (&artefact.image, artefact.filename.clone())
            }
            None => (&self.input.image, self.input.name.clone()),
        };

        let result = match metric {
            Metric::Mse => format!("{:.6}", mse(candidate, &reference.image)?),
            Metric::PeakMse => format!("{:.6}", peak_mse(candidate, &reference.image)?),
            Metric::Snr => format!("{:.6}", snr(candidate, &reference.image)?),
            Metric::Psnr => format!("{:.6}", psnr(candidate, &reference.image)?),
            Metric::MaxDifference => max_difference(candidate, &reference.image)?.to_string(),
        };
        let reference_name = reference.name.clone();

        self.report.comparisons.push(ComparisonEntry {
            metric: op.name().to_string(),
            description: metric.description().to_string(),
            result: result.clone(),
            name1: candidate_name,
            name2: reference_name,
        });
        Ok(result)
    }
}

/// Execute a parsed command line.
///
/// Resources are reloaded first when configured, then every operation is validated before
/// the images are loaded. Operations run in order and the artefacts are written only after
/// the last one succeeds, so a failing run leaves no output behind.
///
/// # Errors
///
/// Returns the first parsing, validation, image or I/O error.
pub fn run(
    invocation: &Invocation,
    config: &PipelineConfig,
) -> Result<ExecutionReport, PipelineError> {
    if let Some(path) = &config.resources {
        log::info!("reloading resources from {}", path.display());
        resources::reload_from_path(path)?;
    }

    let operations = invocation
        .requests
        .iter()
        .map(Operation::from_request)
        .collect::<Result<Vec<_>, _>>()?;
    for op in &operations {
        op.check_resources()?;
    }

    let input = NamedImage::load(&invocation.input)?;
    let comparison = invocation
        .comparison
        .as_ref()
        .map(NamedImage::load)
        .transpose()?;

    let mut pipeline = Pipeline::new(config, input, comparison);
    for op in &operations {
        pipeline.execute(op)?;
    }
    pipeline.finish()
}
