use std::collections::VecDeque;
use std::str::FromStr;

use dipkit_image::{Image, ImageError, ImageSize};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Seed used for region colours when the caller does not provide one.
pub const DEFAULT_REGION_SEED: u64 = 0x5EED;

/// Distance between two colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Square root of the summed squared differences.
    #[default]
    Euclidean,
    /// Sum of absolute differences.
    Manhattan,
    /// Largest absolute difference.
    Chebyshev,
}

impl DistanceMetric {
    /// Map the numeric criterion `0`, `1`, `2` to a metric.
    pub fn from_index(index: i64) -> Result<Self, ImageError> {
        match index {
            0 => Ok(Self::Euclidean),
            1 => Ok(Self::Manhattan),
            2 => Ok(Self::Chebyshev),
            _ => Err(ImageError::InvalidArgument(format!(
                "distance metric must be 0, 1 or 2, got {index}"
            ))),
        }
    }

    /// Distance between two points of the same dimension.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let diffs = a.iter().zip(b).map(|(p, q)| (p - q).abs());
        match self {
            Self::Euclidean => diffs.map(|d| d * d).sum::<f64>().sqrt(),
            Self::Manhattan => diffs.sum(),
            Self::Chebyshev => diffs.fold(0.0, f64::max),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            "chebyshev" => Ok(Self::Chebyshev),
            other => other
                .parse::<i64>()
                .map_err(|_| ImageError::InvalidArgument(format!("unknown distance metric: {s}")))
                .and_then(Self::from_index),
        }
    }
}

/// Parameters for seeded region growing.
#[derive(Debug, Clone)]
pub struct RegionGrowParams {
    /// Colour distance used to admit neighbours.
    pub metric: DistanceMetric,
    /// Largest admitted distance to the seed colour.
    pub threshold: f64,
    /// Seed of the generator that picks region colours.
    pub random_seed: u64,
}

impl Default for RegionGrowParams {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Euclidean,
            threshold: 20.0,
            random_seed: DEFAULT_REGION_SEED,
        }
    }
}

/// Parse a seed list of the form `[x,y][x,y]...`.
///
/// Whitespace between tokens is ignored.
///
/// # Errors
///
/// Returns [`ImageError::InvalidArgument`] if the list is empty or malformed.
pub fn parse_seed_points(text: &str) -> Result<Vec<[usize; 2]>, ImageError> {
    let malformed = || ImageError::InvalidArgument(format!("malformed seed list: '{text}'"));
    let mut seeds = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let body = rest.strip_prefix('[').ok_or_else(malformed)?;
        let end = body.find(']').ok_or_else(malformed)?;
        let (x, y) = body[..end].split_once(',').ok_or_else(malformed)?;
        let x = x.trim().parse::<usize>().map_err(|_| malformed())?;
        let y = y.trim().parse::<usize>().map_err(|_| malformed())?;
        seeds.push([x, y]);
        rest = body[end + 1..].trim_start();
    }
    if seeds.is_empty() {
        return Err(malformed());
    }
    Ok(seeds)
}

/// Colour of every pixel as a point in 1-D gray space or 3-D RGB space.
fn colour_points(src: &Image<u8, 4>) -> (Vec<f64>, usize) {
    let is_gray = src
        .as_slice()
        .chunks_exact(4)
        .all(|px| px[0] == px[1] && px[1] == px[2]);
    if is_gray {
        let points = src.as_slice().chunks_exact(4).map(|px| px[0] as f64).collect();
        (points, 1)
    } else {
        let points = src
            .as_slice()
            .chunks_exact(4)
            .flat_map(|px| [px[0] as f64, px[1] as f64, px[2] as f64])
            .collect();
        (points, 3)
    }
}

#[inline]
fn colour_at(points: &[f64], dim: usize, width: usize, x: usize, y: usize) -> &[f64] {
    &points[(y * width + x) * dim..][..dim]
}

/// Seeded region growing over 8-connectivity.
///
/// Seeds are processed in order; a seed already covered by an earlier region is skipped. Each
/// new region gets a random colour and grows breadth-first to every unlabelled neighbour whose
/// colour lies within `threshold` of the seed colour. Pixels reached by no region are black.
/// When every pixel is gray the distance is taken in one dimension, otherwise in RGB.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGBA image with painted regions.
/// * `seeds` - Seed pixels as `[x, y]`.
/// * `params` - Metric, threshold and colour seed.
///
/// # Returns
///
/// The number of regions grown.
pub fn region_grow(
    src: &Image<u8, 4>,
    dst: &mut Image<u8, 4>,
    seeds: &[[usize; 2]],
    params: &RegionGrowParams,
) -> Result<usize, ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }
    if !params.threshold.is_finite() || params.threshold < 0.0 {
        return Err(ImageError::InvalidArgument(format!(
            "threshold must be a finite value >= 0, got {}",
            params.threshold
        )));
    }
    let ImageSize { width, height } = src.size();
    if let Some([x, y]) = seeds.iter().find(|[x, y]| *x >= width || *y >= height) {
        return Err(ImageError::PixelIndexOutOfBounds(*x, *y, width, height));
    }

    let (points, dim) = colour_points(src);
    let colour = |x: usize, y: usize| colour_at(&points, dim, width, x, y);

    let mut rng = StdRng::seed_from_u64(params.random_seed);
    let mut labels: Vec<Option<usize>> = vec![None; width * height];
    dst.as_slice_mut()
        .chunks_exact_mut(4)
        .for_each(|px| px.copy_from_slice(&[0, 0, 0, 255]));

    let mut regions = 0;
    let mut queue = VecDeque::new();
    for &[sx, sy] in seeds {
        if labels[sy * width + sx].is_some() {
            continue;
        }
        let label = regions;
        regions += 1;
        let paint = [rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>(), 255];
        let seed_colour = colour(sx, sy);

        queue.push_back((sx, sy));
        while let Some((x, y)) = queue.pop_front() {
            if labels[y * width + x].is_some() {
                continue;
            }
            labels[y * width + x] = Some(label);
            dst.pixel_mut(x, y).copy_from_slice(&paint);

            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let (Some(qx), Some(qy)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                    else {
                        continue;
                    };
                    if qx >= width || qy >= height || labels[qy * width + qx].is_some() {
                        continue;
                    }
                    if params.metric.distance(colour(qx, qy), seed_colour) <= params.threshold {
                        queue.push_back((qx, qy));
                    }
                }
            }
        }
    }

    log::debug!("region growing produced {regions} regions from {} seeds", seeds.len());
    Ok(regions)
}
