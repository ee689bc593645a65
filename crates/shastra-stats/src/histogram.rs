use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Default number of bins, matching the main-sample histogram of a stacked
/// plot.
pub const DEFAULT_BINS: usize = 15;

/// Binning configuration for [`Histogram`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Number of equal-width bins.
    pub bins: usize,
    /// Explicit `(lower, upper)` range. `None` spans the data.
    pub range: Option<(f64, f64)>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            range: None,
        }
    }
}

/// A histogram representation of a dataset's distribution.
///
/// The range is divided into equal-width bins. Every bin is half-open except
/// the last, which also includes its upper edge. Values outside an explicit
/// range are not counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin.
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram from values.
    ///
    /// Without an explicit range the bins span `[min, max]`; when every
    /// value is identical the range is widened to `[v - 0.5, v + 0.5]`.
    /// NaN values are ignored. An empty input or zero bins yields an empty
    /// histogram.
    ///
    /// # Examples
    ///
    /// ```
    /// # use shastra_stats::histogram::{Histogram, HistogramConfig};
    /// let values = [1.0, 2.0, 2.5, 4.0];
    /// let config = HistogramConfig { bins: 3, range: None };
    /// let histogram = Histogram::new(values, &config);
    /// let counts: Vec<u64> = histogram.bins.iter().map(|b| b.count).collect();
    /// assert_eq!(counts, [1, 2, 1]);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn new<I>(values: I, config: &HistogramConfig) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        let num_bins = config.bins;
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        let (mut lower, mut upper) = match config.range {
            Some(range) => range,
            None => {
                if values.is_empty() {
                    return Self { bins: vec![] };
                }
                let min = values.iter().copied().fold(f64::INFINITY, f64::min);
                let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max)
            }
        };
        if upper - lower < f64::EPSILON * lower.abs().max(1.0) {
            // Single-valued data: give the bins a unit width around it
            lower -= 0.5;
            upper += 0.5;
        }

        let width = (upper - lower) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|idx| {
                // Recompute edges from the index to avoid accumulated error
                let start = lower + (upper - lower) * (idx as f64) / num_bins as f64;
                let end = if idx + 1 == num_bins {
                    upper
                } else {
                    lower + (upper - lower) * ((idx + 1) as f64) / num_bins as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        for val in values {
            if val < lower || val > upper {
                continue;
            }
            let idx = (((val - lower) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// Total number of counted values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Largest bin count, or 0 for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}
