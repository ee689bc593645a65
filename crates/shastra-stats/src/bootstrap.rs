//! Bootstrap estimation of estimator uncertainty.
//!
//! A bootstrap run draws `resamples` samples with replacement from the
//! observed values, each as long as the input. Mean, median and standard
//! deviation are computed for every resample, and the spread (population
//! standard deviation) of each of those three sequences is reported. The
//! result measures how uncertain the estimators themselves are, not the
//! scatter of individual values.
//!
//! # Determinism
//!
//! Resample `i` draws from its own [`Pcg32`] stream `Pcg32::new(seed, i)`.
//! The output therefore depends only on the values, the resample count and
//! the seed, whether resamples run serially or in parallel.

use rand::Rng as _;
use rand_pcg::Pcg32;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    StatsError,
    descriptive::{self, median_in_place},
    error::ensure_finite,
};

/// Default number of bootstrap resamples.
pub const DEFAULT_RESAMPLES: usize = 10_000;

/// Bootstrap configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of resamples to draw (default: 10,000).
    pub resamples: usize,
    /// Base seed. `None` draws a fresh seed from the thread RNG on every call.
    pub seed: Option<u64>,
    /// Whether to spread resamples over the rayon thread pool.
    pub parallel: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            resamples: DEFAULT_RESAMPLES,
            seed: None,
            parallel: true,
        }
    }
}

/// Spread of the bootstrap distributions of the mean, median and standard
/// deviation estimators. All three are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalEstimate {
    pub std_mean: f64,
    pub std_median: f64,
    pub std_std: f64,
}

/// Computes [`IntervalEstimate`]s by bootstrap resampling.
#[derive(Debug, Clone, Default)]
pub struct ResamplingEstimator {
    config: BootstrapConfig,
}

#[derive(Debug, Clone, Copy)]
struct ResampleStats {
    mean: f64,
    median: f64,
    std: f64,
}

impl ResamplingEstimator {
    #[must_use]
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Estimates the sampling uncertainty of mean, median and standard
    /// deviation for `values`.
    ///
    /// # Errors
    ///
    /// * [`StatsError::EmptyInput`] if `values` is empty
    /// * [`StatsError::TooFewValues`] if `values` has a single element
    /// * [`StatsError::NonFinite`] if any value is NaN or infinite
    /// * [`StatsError::InvalidResampleCount`] if the configuration asks for
    ///   zero resamples
    ///
    /// # Examples
    ///
    /// ```
    /// use shastra_stats::bootstrap::{BootstrapConfig, ResamplingEstimator};
    ///
    /// let estimator = ResamplingEstimator::new(BootstrapConfig {
    ///     resamples: 1000,
    ///     seed: Some(7),
    ///     parallel: false,
    /// });
    /// let first = estimator.interval(&[2.0, 4.0, 4.0, 5.0, 9.0]).unwrap();
    /// let second = estimator.interval(&[2.0, 4.0, 4.0, 5.0, 9.0]).unwrap();
    /// assert_eq!(first, second);
    /// ```
    pub fn interval(&self, values: &[f64]) -> Result<IntervalEstimate, StatsError> {
        if values.is_empty() {
            return Err(StatsError::EmptyInput);
        }
        if values.len() < 2 {
            return Err(StatsError::TooFewValues {
                got: values.len(),
                min: 2,
            });
        }
        ensure_finite(values)?;
        if self.config.resamples == 0 {
            return Err(StatsError::InvalidResampleCount);
        }

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let resamples = if self.config.parallel {
            (0..self.config.resamples)
                .into_par_iter()
                .map_init(
                    || Vec::with_capacity(values.len()),
                    |buf, index| resample(values, seed, index, buf),
                )
                .collect::<Vec<_>>()
        } else {
            let mut buf = Vec::with_capacity(values.len());
            (0..self.config.resamples)
                .map(|index| resample(values, seed, index, &mut buf))
                .collect::<Vec<_>>()
        };

        Ok(IntervalEstimate {
            std_mean: spread(resamples.iter().map(|r| r.mean)),
            std_median: spread(resamples.iter().map(|r| r.median)),
            std_std: spread(resamples.iter().map(|r| r.std)),
        })
    }
}

/// Draws resample `index` into `buf` and summarizes it.
fn resample(values: &[f64], seed: u64, index: usize, buf: &mut Vec<f64>) -> ResampleStats {
    let mut rng = Pcg32::new(seed, index as u64);
    buf.clear();
    buf.extend((0..values.len()).map(|_| values[rng.random_range(0..values.len())]));

    let mean = descriptive::mean(buf);
    let std = descriptive::population_variance(buf, mean).sqrt();
    let median = median_in_place(buf);
    ResampleStats { mean, median, std }
}

fn spread<I>(values: I) -> f64
where
    I: Iterator<Item = f64>,
{
    let values = values.collect::<Vec<_>>();
    descriptive::population_std(&values)
}
