//! Histogram engine.
//!
//! Per-channel 256-bin histograms, scalar descriptors computed from them, the Rayleigh
//! histogram transformation and a bar-chart rasteriser.

mod raster;
mod rayleigh;
mod stats;

pub use raster::{render_histogram, HISTOGRAM_RASTER_SIZE};
pub use rayleigh::rayleigh;
pub use stats::HistogramStat;

use dipkit_image::{Image, ImageError};
use rayon::prelude::*;

use crate::color;

/// Number of intensity levels of an 8-bit channel.
pub const NUM_LEVELS: usize = 256;

/// Channel of an RGBA image a histogram is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
    /// Rounded luminance, see [`color::luma`].
    #[default]
    Luma,
}

impl Channel {
    /// Short lowercase name, as used in file names and arguments.
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Red => "r",
            Channel::Green => "g",
            Channel::Blue => "b",
            Channel::Luma => "luma",
        }
    }

    /// Colour used to draw bars for this channel.
    pub fn bar_color(&self) -> [u8; 3] {
        match self {
            Channel::Red => [200, 30, 30],
            Channel::Green => [30, 160, 30],
            Channel::Blue => [30, 30, 200],
            Channel::Luma => [90, 90, 90],
        }
    }

    #[inline]
    fn sample(&self, px: &[u8]) -> u8 {
        match self {
            Channel::Red => px[0],
            Channel::Green => px[1],
            Channel::Blue => px[2],
            Channel::Luma => color::clamp_u8(color::luma(px[0], px[1], px[2])),
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::Red),
            "g" | "green" => Ok(Channel::Green),
            "b" | "blue" => Ok(Channel::Blue),
            "l" | "luma" | "gray" | "grey" => Ok(Channel::Luma),
            other => Err(ImageError::InvalidArgument(format!(
                "unknown histogram channel '{other}'"
            ))),
        }
    }
}

/// A 256-bin intensity histogram.
///
/// The sum of all bins equals the number of pixels of the source channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: [u64; NUM_LEVELS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: [0; NUM_LEVELS],
        }
    }
}

impl Histogram {
    /// Create a histogram from explicit bin counts.
    pub fn from_bins(bins: [u64; NUM_LEVELS]) -> Self {
        Self { bins }
    }

    /// Count the values of `channel` over every pixel of an RGBA image.
    ///
    /// # Example
    ///
    /// ```
    /// use dipkit_image::{Image, ImageSize};
    /// use dipkit_imgproc::histogram::{Channel, Histogram};
    ///
    /// let image = Image::<u8, 4>::from_size_pixel(
    ///     ImageSize { width: 10, height: 10 },
    ///     [128, 128, 128, 255],
    /// )
    /// .unwrap();
    ///
    /// let hist = Histogram::from_image(&image, Channel::Red);
    /// assert_eq!(hist.bins()[128], 100);
    /// assert_eq!(hist.total(), 100);
    /// ```
    pub fn from_image(src: &Image<u8, 4>, channel: Channel) -> Self {
        let counts = src
            .as_slice()
            .par_chunks(4 * 4096)
            .fold(
                || [0u64; NUM_LEVELS],
                |mut local, chunk| {
                    for px in chunk.chunks_exact(4) {
                        local[channel.sample(px) as usize] += 1;
                    }
                    local
                },
            )
            .reduce(
                || [0u64; NUM_LEVELS],
                |mut a, b| {
                    a.iter_mut().zip(b.iter()).for_each(|(x, y)| *x += y);
                    a
                },
            );

        Self { bins: counts }
    }

    /// The bin counts.
    pub fn bins(&self) -> &[u64; NUM_LEVELS] {
        &self.bins
    }

    /// Total number of samples, `N = sum(H[i])`.
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// The largest bin count.
    pub fn max_count(&self) -> u64 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// Cumulative distribution normalised to `[0, 1]`.
    ///
    /// An empty histogram yields all zeros.
    pub fn cumulative(&self) -> [f64; NUM_LEVELS] {
        let total = self.total();
        let mut cdf = [0.0; NUM_LEVELS];
        if total == 0 {
            return cdf;
        }
        let mut acc = 0u64;
        for (c, &h) in cdf.iter_mut().zip(self.bins.iter()) {
            acc += h;
            *c = acc as f64 / total as f64;
        }
        cdf
    }
}
