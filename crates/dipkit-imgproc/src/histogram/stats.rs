use dipkit_image::ImageError;

use super::Histogram;

/// Scalar descriptors computed from a [`Histogram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramStat {
    /// Mean intensity.
    Mean,
    /// Variance of the intensity.
    Variance,
    /// Standard deviation of the intensity.
    StdDev,
    /// Variation coefficient I, `sigma / mean`.
    VariationI,
    /// Asymmetry (skewness) coefficient.
    Asymmetry,
    /// Flatness (excess kurtosis) coefficient.
    Flatness,
    /// Variation coefficient II, `sum(H[i]^2) / N^2`.
    VariationII,
    /// Information source entropy in bits.
    Entropy,
}

impl HistogramStat {
    /// Human readable description of the descriptor.
    pub fn description(&self) -> &'static str {
        match self {
            HistogramStat::Mean => "Mean intensity",
            HistogramStat::Variance => "Intensity variance",
            HistogramStat::StdDev => "Standard deviation",
            HistogramStat::VariationI => "Variation coefficient I",
            HistogramStat::Asymmetry => "Asymmetry coefficient",
            HistogramStat::Flatness => "Flattening coefficient",
            HistogramStat::VariationII => "Variation coefficient II",
            HistogramStat::Entropy => "Information source entropy",
        }
    }

    /// Evaluate the descriptor over a histogram.
    pub fn evaluate(&self, hist: &Histogram) -> Result<f64, ImageError> {
        match self {
            HistogramStat::Mean => hist.mean(),
            HistogramStat::Variance => Ok(hist.variance()),
            HistogramStat::StdDev => Ok(hist.std_dev()),
            HistogramStat::VariationI => Ok(hist.variation_coefficient_i()),
            HistogramStat::Asymmetry => Ok(hist.asymmetry()),
            HistogramStat::Flatness => Ok(hist.flatness()),
            HistogramStat::VariationII => Ok(hist.variation_coefficient_ii()),
            HistogramStat::Entropy => Ok(hist.entropy()),
        }
    }
}

impl Histogram {
    fn mean_or_zero(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        let weighted: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &h)| i as f64 * h as f64)
            .sum();
        weighted / n as f64
    }

    /// `sum((i - mean)^k * H[i]) / N`, zero for an empty histogram.
    fn central_moment(&self, k: i32) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        let mean = self.mean_or_zero();
        let acc: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(i, &h)| (i as f64 - mean).powi(k) * h as f64)
            .sum();
        acc / n as f64
    }

    /// Mean intensity `sum(i * H[i]) / N`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::DegenerateInput`] for an empty histogram.
    pub fn mean(&self) -> Result<f64, ImageError> {
        if self.total() == 0 {
            return Err(ImageError::DegenerateInput(
                "mean of an empty histogram".into(),
            ));
        }
        Ok(self.mean_or_zero())
    }

    /// Variance `sum((i - mean)^2 * H[i]) / N`.
    pub fn variance(&self) -> f64 {
        self.central_moment(2)
    }

    /// Standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Variation coefficient I, `sigma / mean`; zero when the mean is zero.
    pub fn variation_coefficient_i(&self) -> f64 {
        let mean = self.mean_or_zero();
        if mean == 0.0 {
            return 0.0;
        }
        self.std_dev() / mean
    }

    /// Asymmetry coefficient `sum((i - mean)^3 * H[i]) / N / sigma^3`; zero when `sigma = 0`.
    pub fn asymmetry(&self) -> f64 {
        let sigma = self.std_dev();
        if sigma == 0.0 {
            return 0.0;
        }
        self.central_moment(3) / sigma.powi(3)
    }

    /// Flatness coefficient `sum((i - mean)^4 * H[i]) / N / sigma^4 - 3`; zero when `sigma = 0`.
    pub fn flatness(&self) -> f64 {
        let sigma = self.std_dev();
        if sigma == 0.0 {
            return 0.0;
        }
        self.central_moment(4) / sigma.powi(4) - 3.0
    }

    /// Variation coefficient II, `sum(H[i]^2) / N^2`.
    pub fn variation_coefficient_ii(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        let squares: f64 = self.bins.iter().map(|&h| (h as f64).powi(2)).sum();
        squares / (n as f64).powi(2)
    }

    /// Entropy `-(1/N) * sum(H[i] * log2(H[i] / N))` over the non-empty bins.
    pub fn entropy(&self) -> f64 {
        let n = self.total();
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        let acc: f64 = self
            .bins
            .iter()
            .filter(|&&h| h > 0)
            .map(|&h| h as f64 * (h as f64 / n).log2())
            .sum();
        -acc / n
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, HistogramStat};
    use approx::assert_relative_eq;
    use dipkit_image::{Image, ImageError, ImageSize};

    use crate::histogram::Channel;

    #[test]
    fn uniform_gray_image() -> Result<(), ImageError> {
        let image = Image::<u8, 4>::from_size_pixel(
            ImageSize {
                width: 100,
                height: 100,
            },
            [128, 128, 128, 255],
        )?;
        let hist = Histogram::from_image(&image, Channel::Red);
        assert_eq!(hist.bins()[128], 10000);
        assert_eq!(hist.total(), 10000);
        assert_eq!(hist.mean()?, 128.0);
        assert_eq!(hist.variance(), 0.0);
        assert_eq!(hist.entropy(), 0.0);
        assert_eq!(hist.asymmetry(), 0.0);
        assert_eq!(hist.flatness(), 0.0);
        assert_eq!(hist.variation_coefficient_ii(), 1.0);
        Ok(())
    }

    #[test]
    fn two_level_histogram() -> Result<(), ImageError> {
        let mut bins = [0u64; 256];
        bins[0] = 2;
        bins[100] = 2;
        let hist = Histogram::from_bins(bins);
        assert_relative_eq!(hist.mean()?, 50.0);
        assert_relative_eq!(hist.variance(), 2500.0);
        assert_relative_eq!(hist.std_dev(), 50.0);
        assert_relative_eq!(hist.variation_coefficient_i(), 1.0);
        assert_relative_eq!(hist.asymmetry(), 0.0);
        assert_relative_eq!(hist.flatness(), -2.0);
        assert_relative_eq!(hist.variation_coefficient_ii(), 0.5);
        assert_relative_eq!(hist.entropy(), 1.0);
        Ok(())
    }

    #[test]
    fn skewed_histogram_has_positive_asymmetry() {
        let mut bins = [0u64; 256];
        bins[0] = 9;
        bins[255] = 1;
        assert!(Histogram::from_bins(bins).asymmetry() > 0.0);
    }

    #[test]
    fn empty_histogram() {
        let hist = Histogram::default();
        assert!(matches!(hist.mean(), Err(ImageError::DegenerateInput(_))));
        assert_eq!(hist.variance(), 0.0);
        assert_eq!(hist.entropy(), 0.0);
        assert_eq!(hist.variation_coefficient_ii(), 0.0);
        assert_eq!(hist.variation_coefficient_i(), 0.0);
        assert!(HistogramStat::Mean.evaluate(&hist).is_err());
        assert_eq!(HistogramStat::Flatness.evaluate(&hist), Ok(0.0));
    }

    #[test]
    fn histogram_moments_match_direct_computation() -> Result<(), ImageError> {
        let data: Vec<u8> = (0..64 * 4).map(|i| ((i * 37 + 11) % 251) as u8).collect();
        let image = Image::<u8, 4>::new(
            ImageSize {
                width: 8,
                height: 8,
            },
            data,
        )?;
        let hist = Histogram::from_image(&image, Channel::Blue);
        let values: Vec<f64> = image.as_slice().chunks_exact(4).map(|p| p[2] as f64).collect();
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        assert_relative_eq!(hist.mean()?, mean, epsilon = 1e-9);
        assert_relative_eq!(hist.variance(), var, epsilon = 1e-9);
        Ok(())
    }
}
