//! Statistical kernels for comparing catalog samples.
//!
//! This crate provides the numeric side of a sample-comparison study:
//!
//! - **Descriptive statistics**: mean, median and population standard deviation
//! - **Bootstrap resampling**: spread of the mean/median/std estimators
//! - **Two-sample tests**: Kolmogorov–Smirnov and k-sample Anderson–Darling
//! - **Comparison**: both tests run over the same pair of value arrays
//! - **Histogram generation**: equal-width bin counts for external plotting
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`bootstrap`]: Bootstrap estimation of estimator uncertainty
//! - [`ks`]: Two-sample Kolmogorov–Smirnov test
//! - [`anderson`]: k-sample Anderson–Darling test
//! - [`comparison`]: Combined two-sample comparison
//! - [`histogram`]: Histogram construction for visualizing data distributions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use shastra_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Bootstrap uncertainty
//!
//! ```
//! use shastra_stats::bootstrap::{BootstrapConfig, ResamplingEstimator};
//!
//! let config = BootstrapConfig {
//!     resamples: 500,
//!     seed: Some(1),
//!     ..BootstrapConfig::default()
//! };
//! let estimate = ResamplingEstimator::new(config)
//!     .interval(&[1.0, 2.0, 3.0, 4.0, 5.0])
//!     .unwrap();
//! assert!(estimate.std_mean > 0.0);
//! ```
//!
//! ## Comparing two samples
//!
//! ```
//! use shastra_stats::comparison::compare;
//!
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let result = compare(&a, &a).unwrap();
//! assert_eq!(result.ks_statistic, 0.0);
//! assert_eq!(result.ks_p_value, 1.0);
//! ```

pub mod anderson;
pub mod bootstrap;
pub mod comparison;
pub mod descriptive;
mod error;
pub mod histogram;
pub mod ks;

pub use self::error::{DegenerateKind, SampleSide, StatsError, StatsWarning};
