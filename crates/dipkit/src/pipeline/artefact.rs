use std::path::{Path, PathBuf};

use dipkit_image::Image;
use dipkit_io::write_image_bmp;

use super::PipelineError;

/// What produced an artefact, as far as later selection rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtefactKind {
    /// Output of an ordinary image operation.
    Processed,
    /// Output of a noise filter; preferred by similarity metrics.
    Denoised,
    /// Output of the Rayleigh transformation; gets a second raster from `histogram`.
    Rayleigh,
    /// Magnitude spectrum.
    Spectrum,
    /// Histogram bar chart; skipped by histogram descriptors.
    Histogram,
}

/// An image produced by the pipeline together with its output file name.
#[derive(Debug, Clone)]
pub struct Artefact {
    /// The produced image.
    pub image: Image<u8, 4>,
    /// File name, relative to the output directory.
    pub filename: String,
    /// Provenance.
    pub kind: ArtefactKind,
}

impl Artefact {
    /// Whether a noise filter produced the artefact.
    pub fn is_denoised(&self) -> bool {
        self.kind == ArtefactKind::Denoised
    }

    /// Whether the artefact is a histogram raster.
    pub fn is_histogram(&self) -> bool {
        self.kind == ArtefactKind::Histogram
    }

    /// File name without the `.bmp` extension.
    pub fn stem(&self) -> &str {
        self.filename
            .strip_suffix(".bmp")
            .unwrap_or(&self.filename)
    }
}

/// Ordered list of artefacts, flushed once at the end of a run.
#[derive(Debug, Default)]
pub struct ArtefactQueue {
    artefacts: Vec<Artefact>,
}

impl ArtefactQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artefact.
    pub fn push(&mut self, image: Image<u8, 4>, filename: String, kind: ArtefactKind) {
        log::debug!("queued {filename} ({kind:?})");
        self.artefacts.push(Artefact {
            image,
            filename,
            kind,
        });
    }

    /// Most recent denoised artefact.
    pub fn latest_denoised(&self) -> Option<&Artefact> {
        self.artefacts.iter().rev().find(|a| a.is_denoised())
    }

    /// Most recent Rayleigh artefact.
    pub fn latest_rayleigh(&self) -> Option<&Artefact> {
        self.artefacts
            .iter()
            .rev()
            .find(|a| a.kind == ArtefactKind::Rayleigh)
    }

    /// Earliest artefact that is not a histogram raster.
    pub fn earliest_non_histogram(&self) -> Option<&Artefact> {
        self.artefacts.iter().find(|a| !a.is_histogram())
    }

    /// Queued artefacts in order.
    pub fn artefacts(&self) -> &[Artefact] {
        &self.artefacts
    }

    /// Number of queued artefacts.
    pub fn len(&self) -> usize {
        self.artefacts.len()
    }

    /// Whether nothing was queued.
    pub fn is_empty(&self) -> bool {
        self.artefacts.is_empty()
    }

    /// Write every artefact as BMP into `dir`, consuming the queue.
    ///
    /// The directory is created when missing.
    ///
    /// # Returns
    ///
    /// The written paths in queue order.
    pub fn write_all(self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, PipelineError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(dipkit_io::IoError::from)?;
        self.artefacts
            .into_iter()
            .map(|artefact| {
                let path = dir.join(&artefact.filename);
                write_image_bmp(&path, &artefact.image)?;
                log::info!("wrote {}", path.display());
                Ok(path)
            })
            .collect()
    }
}
