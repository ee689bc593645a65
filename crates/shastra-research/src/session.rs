//! Sample-comparison sessions
//!
//! A [`ResearchSession`] ties together a catalog, one main sample, any
//! number of control samples and a registry of parameters. Every operation
//! resolves a (sample, parameter) pair to values through the catalog and
//! hands them to the kernels in [`shastra_stats`].
//!
//! Batch operations visit the main sample first and then the controls in
//! registration order. What happens when one sample fails is decided by
//! [`BatchPolicy`].

use std::fmt;

use serde::{Serialize, Serializer};
use shastra_catalog::table::Table;
use shastra_stats::{
    StatsError, StatsWarning,
    bootstrap::{IntervalEstimate, ResamplingEstimator},
    comparison::{self, ComparisonResult},
    descriptive::{DescriptiveStats, count_distinct},
    histogram::{Histogram, HistogramConfig},
};

use crate::{
    ResearchError,
    config::{BatchPolicy, ResearchConfig},
    parameter::{Parameter, ParameterRegistry},
    sample::Sample,
};

/// Point estimates and bootstrap uncertainty of one parameter over one
/// sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleStatistics {
    pub sample: String,
    pub parameter: String,
    pub descriptive: DescriptiveStats,
    pub interval: IntervalEstimate,
    /// Number of NaN values dropped before computing.
    pub omitted_nan: usize,
    pub warnings: Vec<StatsWarning>,
}

impl SampleStatistics {
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.descriptive.mean
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.descriptive.median
    }

    #[must_use]
    pub fn std(&self) -> f64 {
        self.descriptive.std_dev
    }
}

/// Distribution comparison of one parameter between two samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleComparison {
    pub first: String,
    pub second: String,
    pub parameter: String,
    pub result: ComparisonResult,
    /// Number of NaN values dropped from the first sample.
    pub omitted_nan_first: usize,
    /// Number of NaN values dropped from the second sample.
    pub omitted_nan_second: usize,
}

/// Histogram of one parameter over one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleHistogram {
    pub sample: String,
    pub histogram: Histogram,
}

/// A sample skipped by a batch run under [`BatchPolicy::SkipFailures`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchFailure {
    pub sample: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: ResearchError,
}

/// Results of a batch operation, in sample order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport<R> {
    pub parameter: String,
    pub entries: Vec<R>,
    pub failures: Vec<BatchFailure>,
}

impl<R> BatchReport<R> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

fn serialize_display<S>(value: &ResearchError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

/// A main sample studied against control samples drawn from one table.
///
/// # Examples
///
/// ```
/// use shastra_catalog::table::Catalog;
/// use shastra_research::{
///     config::ResearchConfig,
///     parameter::{Parameter, ParameterRegistry},
///     sample::Sample,
///     session::ResearchSession,
/// };
/// use shastra_stats::bootstrap::BootstrapConfig;
///
/// let catalog = Catalog::new("objid", ["a", "b", "c", "d", "e", "f"])
///     .with_column("mass", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
///     .unwrap();
/// let parameters = ParameterRegistry::new().with(Parameter::column("mass")).unwrap();
/// let config = ResearchConfig {
///     bootstrap: BootstrapConfig { resamples: 200, seed: Some(1), parallel: false },
///     ..ResearchConfig::default()
/// };
///
/// let session = ResearchSession::new(&catalog, Sample::new("low", ["a", "b", "c"]), parameters)
///     .with_config(config)
///     .with_control(Sample::new("high", ["d", "e", "f"]))
///     .unwrap();
///
/// let report = session.statistics_for_all("mass").unwrap();
/// let means: Vec<f64> = report.entries.iter().map(|s| s.mean()).collect();
/// assert_eq!(means, [2.0, 5.0]);
///
/// let comparisons = session.compare_all("mass").unwrap();
/// assert_eq!(comparisons.entries[0].result.ks_statistic, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct ResearchSession<T> {
    table: T,
    main: Sample,
    controls: Vec<Sample>,
    parameters: ParameterRegistry,
    config: ResearchConfig,
}

impl<T> ResearchSession<T>
where
    T: Table,
{
    #[must_use]
    pub fn new(table: T, main: Sample, parameters: ParameterRegistry) -> Self {
        Self {
            table,
            main,
            controls: vec![],
            parameters,
            config: ResearchConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ResearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_config(&mut self, config: ResearchConfig) {
        self.config = config;
    }

    #[must_use]
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Registers a control sample.
    ///
    /// Sample names must be unique within the session, and the main sample
    /// cannot be registered as its own control.
    pub fn add_control(&mut self, sample: Sample) -> Result<(), ResearchError> {
        if sample.name() == self.main.name() {
            let name = sample.name().to_owned();
            return Err(if sample == self.main {
                ResearchError::MainSampleAsControl { name }
            } else {
                ResearchError::DuplicateSampleName { name }
            });
        }
        if self.controls.iter().any(|c| c.name() == sample.name()) {
            return Err(ResearchError::DuplicateSampleName {
                name: sample.name().to_owned(),
            });
        }
        self.controls.push(sample);
        Ok(())
    }

    pub fn with_control(mut self, sample: Sample) -> Result<Self, ResearchError> {
        self.add_control(sample)?;
        Ok(self)
    }

    #[must_use]
    pub fn table(&self) -> &T {
        &self.table
    }

    #[must_use]
    pub fn main_sample(&self) -> &Sample {
        &self.main
    }

    #[must_use]
    pub fn controls(&self) -> &[Sample] {
        &self.controls
    }

    #[must_use]
    pub fn parameters(&self) -> &ParameterRegistry {
        &self.parameters
    }

    /// The main sample followed by the controls in registration order.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> + '_ {
        std::iter::once(&self.main).chain(&self.controls)
    }

    /// Looks up the main sample or a control by name.
    pub fn sample(&self, name: &str) -> Result<&Sample, ResearchError> {
        self.samples()
            .find(|s| s.name() == name)
            .ok_or_else(|| ResearchError::SampleNotFound {
                name: name.to_owned(),
            })
    }

    /// Values of `parameter` over the rows of the named sample, in table
    /// row order. NaN values are returned as read.
    pub fn get_values(&self, sample: &str, parameter: &str) -> Result<Vec<f64>, ResearchError> {
        let parameter = self.parameters.get(parameter)?;
        let sample = self.sample(sample)?;
        self.read_values(sample, parameter)
    }

    fn read_values(&self, sample: &Sample, parameter: &Parameter) -> Result<Vec<f64>, ResearchError> {
        let rows = self.table.rows_where_id_in(&sample.id_set());
        Ok(self.table.read_expr(&rows, &parameter.expr)?)
    }

    /// Mean, median and standard deviation of `parameter` over the named
    /// sample, plus their bootstrap uncertainty.
    ///
    /// A sample with a single distinct value is reported with
    /// [`StatsWarning::ConstantValues`].
    pub fn statistics_for(
        &self,
        sample: &str,
        parameter: &str,
    ) -> Result<SampleStatistics, ResearchError> {
        let param = self.parameters.get(parameter)?;
        let sample = self.sample(sample)?;
        self.sample_statistics(sample, param)
    }

    fn sample_statistics(
        &self,
        sample: &Sample,
        parameter: &Parameter,
    ) -> Result<SampleStatistics, ResearchError> {
        let values = self.read_values(sample, parameter)?;
        let (values, omitted_nan) = self.config.nan_policy.apply(values);
        let interval = ResamplingEstimator::new(self.config.bootstrap).interval(&values)?;
        let mut warnings = vec![];
        if count_distinct(&values) < 2 {
            warnings.push(StatsWarning::ConstantValues);
        }
        let descriptive = DescriptiveStats::new(values).ok_or(StatsError::EmptyInput)?;
        Ok(SampleStatistics {
            sample: sample.name().to_owned(),
            parameter: parameter.name.clone(),
            descriptive,
            interval,
            omitted_nan,
            warnings,
        })
    }

    /// Compares the distributions of `parameter` over two named samples.
    pub fn compare_samples(
        &self,
        first: &str,
        second: &str,
        parameter: &str,
    ) -> Result<SampleComparison, ResearchError> {
        let param = self.parameters.get(parameter)?;
        let first = self.sample(first)?;
        let second = self.sample(second)?;
        self.sample_comparison(first, second, param)
    }

    fn sample_comparison(
        &self,
        first: &Sample,
        second: &Sample,
        parameter: &Parameter,
    ) -> Result<SampleComparison, ResearchError> {
        let nan_policy = self.config.nan_policy;
        let (a, omitted_nan_first) = nan_policy.apply(self.read_values(first, parameter)?);
        let (b, omitted_nan_second) = nan_policy.apply(self.read_values(second, parameter)?);
        let result = comparison::compare(&a, &b)?;
        Ok(SampleComparison {
            first: first.name().to_owned(),
            second: second.name().to_owned(),
            parameter: parameter.name.clone(),
            result,
            omitted_nan_first,
            omitted_nan_second,
        })
    }

    /// [`statistics_for`](Self::statistics_for) over the main sample and
    /// then every control.
    pub fn statistics_for_all(
        &self,
        parameter: &str,
    ) -> Result<BatchReport<SampleStatistics>, ResearchError> {
        let param = self.parameters.get(parameter)?;
        self.run_batch(param, self.samples(), |sample| {
            self.sample_statistics(sample, param)
        })
    }

    /// Compares the main sample against every control.
    pub fn compare_all(
        &self,
        parameter: &str,
    ) -> Result<BatchReport<SampleComparison>, ResearchError> {
        let param = self.parameters.get(parameter)?;
        self.run_batch(param, &self.controls, |control| {
            self.sample_comparison(&self.main, control, param)
        })
    }

    /// [`statistics_for_all`](Self::statistics_for_all) for every registered
    /// parameter, in registration order.
    pub fn statistics_all_parameters(
        &self,
    ) -> Result<Vec<BatchReport<SampleStatistics>>, ResearchError> {
        self.parameters
            .names()
            .map(|name| self.statistics_for_all(name))
            .collect()
    }

    fn run_batch<'a, R, F>(
        &'a self,
        parameter: &Parameter,
        samples: impl IntoIterator<Item = &'a Sample>,
        mut f: F,
    ) -> Result<BatchReport<R>, ResearchError>
    where
        F: FnMut(&'a Sample) -> Result<R, ResearchError>,
    {
        let mut report = BatchReport {
            parameter: parameter.name.clone(),
            entries: vec![],
            failures: vec![],
        };
        for sample in samples {
            match f(sample) {
                Ok(entry) => report.entries.push(entry),
                Err(err) => match self.config.batch_policy {
                    BatchPolicy::FailFast => return Err(err.in_sample(sample.name())),
                    BatchPolicy::SkipFailures => report.failures.push(BatchFailure {
                        sample: sample.name().to_owned(),
                        error: err,
                    }),
                },
            }
        }
        Ok(report)
    }

    /// Histogram of `parameter` over the named sample.
    ///
    /// Non-finite values are not counted.
    pub fn histogram(
        &self,
        sample: &str,
        parameter: &str,
        config: &HistogramConfig,
    ) -> Result<Histogram, ResearchError> {
        let values = self.get_values(sample, parameter)?;
        Ok(Histogram::new(
            values.into_iter().filter(|v| v.is_finite()),
            config,
        ))
    }

    /// Histograms of `parameter` for the main sample and every control,
    /// sharing one set of bin edges.
    ///
    /// Without an explicit range the bins span the finite values of all
    /// samples together.
    pub fn stacked_histograms(
        &self,
        parameter: &str,
        config: &HistogramConfig,
    ) -> Result<Vec<SampleHistogram>, ResearchError> {
        let param = self.parameters.get(parameter)?;
        let values = self
            .samples()
            .map(|sample| {
                let values = self.read_values(sample, param)?;
                let finite = values
                    .into_iter()
                    .filter(|v| v.is_finite())
                    .collect::<Vec<_>>();
                Ok::<_, ResearchError>((sample, finite))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let range = config.range.or_else(|| {
            let all = values.iter().flat_map(|(_, v)| v.iter().copied());
            let (lo, hi) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
            (lo <= hi).then_some((lo, hi))
        });
        let config = HistogramConfig { range, ..*config };

        Ok(values
            .into_iter()
            .map(|(sample, values)| SampleHistogram {
                sample: sample.name().to_owned(),
                histogram: Histogram::new(values, &config),
            })
            .collect())
    }
}

impl<T> fmt::Display for ResearchSession<T>
where
    T: Table,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Catalog: {} rows keyed by '{}'",
            self.table.len(),
            self.table.primary_key()
        )?;
        writeln!(f, "Main sample: {}", self.main)?;
        if self.controls.is_empty() {
            writeln!(f, "Controls: none")?;
        } else {
            writeln!(f, "Controls:")?;
            for control in &self.controls {
                writeln!(f, "  {control}")?;
            }
        }
        if self.parameters.is_empty() {
            write!(f, "Parameters: none")
        } else {
            writeln!(f, "Parameters:")?;
            let mut first = true;
            for parameter in self.parameters.iter() {
                if !first {
                    writeln!(f)?;
                }
                first = false;
                write!(f, "  {} = {}", parameter.name, parameter.expr)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use shastra_catalog::{CatalogError, expr::ColumnExpr, table::Catalog};
    use shastra_stats::{
        SampleSide, StatsWarning, bootstrap::BootstrapConfig, descriptive::population_std,
    };

    use super::*;
    use crate::config::NanPolicy;

    fn test_config() -> ResearchConfig {
        ResearchConfig {
            bootstrap: BootstrapConfig {
                resamples: 200,
                seed: Some(1),
                parallel: false,
            },
            ..ResearchConfig::default()
        }
    }

    fn catalog() -> Catalog {
        Catalog::new("objid", ["a", "b", "c", "d", "e", "f", "g", "h", "i"])
            .with_column(
                "mass",
                vec![1.0, 2.0, 3.0, 10.0, 20.0, 30.0, 5.0, 5.0, f64::NAN],
            )
            .unwrap()
            .with_column(
                "radius",
                vec![1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 2.0, 2.0, 1.0],
            )
            .unwrap()
    }

    fn parameters() -> ParameterRegistry {
        ParameterRegistry::new()
            .with(Parameter::column("mass"))
            .unwrap()
            .with(Parameter::new(
                "density",
                ColumnExpr::column("mass").divided_by(ColumnExpr::column("radius").pow(3.0)),
            ))
            .unwrap()
    }

    fn session(catalog: &Catalog) -> ResearchSession<&Catalog> {
        ResearchSession::new(catalog, Sample::new("main", ["c", "a", "b"]), parameters())
            .with_config(test_config())
            .with_control(Sample::new("control1", ["d", "e", "f"]))
            .unwrap()
            .with_control(Sample::new("control2", ["g", "h", "i", "a"]))
            .unwrap()
    }

    #[test]
    fn test_get_values_in_row_order() {
        let catalog = catalog();
        let session = session(&catalog);
        assert_eq!(session.get_values("main", "mass").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(
            session.get_values("control1", "density").unwrap(),
            [10.0 / 8.0, 20.0, 30.0]
        );
    }

    #[test]
    fn test_statistics_for_all_order_and_values() {
        let catalog = catalog();
        let session = session(&catalog);
        let report = session.statistics_for_all("mass").unwrap();
        assert!(report.is_complete());
        assert_eq!(report.parameter, "mass");

        let names: Vec<&str> = report.entries.iter().map(|s| s.sample.as_str()).collect();
        assert_eq!(names, ["main", "control1", "control2"]);

        for entry in &report.entries {
            let (values, omitted) = NanPolicy::Omit.apply(session.get_values(&entry.sample, "mass").unwrap());
            let expected = DescriptiveStats::new(values.iter().copied()).unwrap();
            assert_eq!(entry.descriptive, expected);
            assert!((entry.std() - population_std(&values)).abs() < 1e-12);
            assert_eq!(entry.omitted_nan, omitted);
        }
        assert_eq!(report.entries[0].mean(), 2.0);
        assert_eq!(report.entries[0].median(), 2.0);
        assert_eq!(report.entries[2].omitted_nan, 1);
        assert_eq!(report.entries[2].median(), 5.0);
    }

    #[test]
    fn test_statistics_are_reproducible() {
        let catalog = catalog();
        let session = session(&catalog);
        let first = session.statistics_for("control1", "mass").unwrap();
        let second = session.statistics_for("control1", "mass").unwrap();
        assert_eq!(first, second);
        assert!(first.interval.std_mean > 0.0);
    }

    struct CountingTable {
        inner: Catalog,
        reads: Cell<usize>,
    }

    impl Table for CountingTable {
        fn primary_key(&self) -> &str {
            self.reads.set(self.reads.get() + 1);
            self.inner.primary_key()
        }

        fn row_ids(&self) -> &[String] {
            self.reads.set(self.reads.get() + 1);
            self.inner.row_ids()
        }

        fn column(&self, name: &str) -> Result<&[f64], CatalogError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.column(name)
        }
    }

    #[test]
    fn test_unknown_parameter_fails_before_table_access() {
        let table = CountingTable {
            inner: catalog(),
            reads: Cell::new(0),
        };
        let session = ResearchSession::new(&table, Sample::new("main", ["a", "b"]), parameters())
            .with_config(test_config());

        let not_found = ResearchError::ParameterNotFound {
            name: "luminosity".to_owned(),
        };
        assert_eq!(session.get_values("main", "luminosity"), Err(not_found.clone()));
        assert_eq!(session.statistics_for("main", "luminosity"), Err(not_found.clone()));
        assert_eq!(session.compare_all("luminosity").unwrap_err(), not_found);
        assert_eq!(table.reads.get(), 0);

        session.get_values("main", "mass").unwrap();
        assert!(table.reads.get() > 0);
    }

    #[test]
    fn test_unknown_sample() {
        let catalog = catalog();
        let session = session(&catalog);
        let err = session.statistics_for("nowhere", "mass").unwrap_err();
        assert_eq!(
            err,
            ResearchError::SampleNotFound {
                name: "nowhere".to_owned()
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_column_propagates() {
        let catalog = catalog();
        let parameters = ParameterRegistry::new()
            .with(Parameter::column("luminosity"))
            .unwrap();
        let session = ResearchSession::new(&catalog, Sample::new("main", ["a"]), parameters);
        assert_eq!(
            session.get_values("main", "luminosity"),
            Err(ResearchError::Catalog(CatalogError::MissingColumn {
                name: "luminosity".to_owned()
            }))
        );
    }

    #[test]
    fn test_compare_all() {
        let catalog = catalog();
        let session = session(&catalog);
        let report = session.compare_all("mass").unwrap();
        assert_eq!(report.entries.len(), 2);
        let first = &report.entries[0];
        assert_eq!((first.first.as_str(), first.second.as_str()), ("main", "control1"));
        assert_eq!(first.result.ks_statistic, 1.0);
        assert_eq!(report.entries[1].second, "control2");
    }

    #[test]
    fn test_compare_samples_flags_constant_sample() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session
            .add_control(Sample::new("flat", ["g", "h"]))
            .unwrap();
        let comparison = session.compare_samples("main", "flat", "mass").unwrap();
        assert!(
            comparison
                .result
                .warnings
                .contains(&StatsWarning::ConstantSample(SampleSide::Second))
        );
    }

    #[test]
    fn test_compare_samples_counts_omitted_nan() {
        let catalog = catalog();
        let session = session(&catalog);
        let comparison = session.compare_samples("main", "control2", "mass").unwrap();
        assert_eq!(comparison.omitted_nan_first, 0);
        assert_eq!(comparison.omitted_nan_second, 1);

        let json = serde_json::to_value(&comparison).unwrap();
        assert_eq!(json["omitted_nan_second"], 1);
    }

    #[test]
    fn test_constant_sample_statistics_are_flagged() {
        let catalog = catalog();
        let mut session = session(&catalog);
        session
            .add_control(Sample::new("flat", ["g", "h"]))
            .unwrap();
        let flat = session.statistics_for("flat", "mass").unwrap();
        assert_eq!(flat.std(), 0.0);
        assert_eq!(flat.interval.std_mean, 0.0);
        assert_eq!(flat.warnings, [StatsWarning::ConstantValues]);

        let main = session.statistics_for("main", "mass").unwrap();
        assert!(main.warnings.is_empty());
    }

    #[test]
    fn test_batch_policies() {
        let catalog = catalog();
        let session = session(&catalog)
            .with_control(Sample::new("single", ["d"]))
            .unwrap();

        let err = session.statistics_for_all("mass").unwrap_err();
        assert_eq!(
            err,
            ResearchError::Stats(StatsError::TooFewValues { got: 1, min: 2 }).in_sample("single")
        );
        assert_eq!(
            err.to_string(),
            "sample 'single': not enough values: got 1, need at least 2"
        );

        let session = session.with_config(ResearchConfig {
            batch_policy: BatchPolicy::SkipFailures,
            ..test_config()
        });
        let report = session.statistics_for_all("mass").unwrap();
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].sample, "single");
        assert!(!report.is_complete());
    }

    #[test]
    fn test_nan_reject() {
        let catalog = catalog();
        let session = session(&catalog).with_config(ResearchConfig {
            nan_policy: NanPolicy::Reject,
            ..test_config()
        });
        assert_eq!(
            session.statistics_for("control2", "mass"),
            Err(ResearchError::Stats(StatsError::NonFinite { index: 3 }))
        );
    }

    #[test]
    fn test_control_registration() {
        let catalog = catalog();
        let mut session = session(&catalog);
        assert_eq!(
            session.add_control(Sample::new("main", ["c", "a", "b"])),
            Err(ResearchError::MainSampleAsControl {
                name: "main".to_owned()
            })
        );
        assert_eq!(
            session.add_control(Sample::new("control1", ["a"])),
            Err(ResearchError::DuplicateSampleName {
                name: "control1".to_owned()
            })
        );
        assert_eq!(session.controls().len(), 2);
    }

    #[test]
    fn test_statistics_all_parameters() {
        let catalog = catalog();
        let session = session(&catalog);
        let reports = session.statistics_all_parameters().unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.parameter.as_str()).collect();
        assert_eq!(names, ["mass", "density"]);
        assert!(reports.iter().all(|r| r.entries.len() == 3));
    }

    #[test]
    fn test_stacked_histograms_share_edges() {
        let catalog = catalog();
        let session = session(&catalog);
        let config = HistogramConfig {
            bins: 3,
            range: None,
        };
        let stacked = session.stacked_histograms("mass", &config).unwrap();
        assert_eq!(stacked.len(), 3);
        assert_eq!(stacked[0].sample, "main");
        for entry in &stacked {
            assert_eq!(entry.histogram.bins[0].range.start, 1.0);
            assert_eq!(entry.histogram.bins[2].range.end, 30.0);
        }
        assert_eq!(stacked[0].histogram.total(), 3);
        assert_eq!(stacked[2].histogram.total(), 3);

        let single = session.histogram("control2", "mass", &config).unwrap();
        assert_eq!(single.total(), 3);
    }

    #[test]
    fn test_display() {
        let catalog = catalog();
        let session = session(&catalog);
        let text = session.to_string();
        assert!(text.starts_with("Catalog: 9 rows keyed by 'objid'\n"));
        assert!(text.contains("Main sample: main (3 objects)"));
        assert!(text.contains("  control2 (4 objects)"));
        assert!(text.ends_with("  density = mass / (radius ** 3)"));
    }

    #[test]
    fn test_failure_serializes_message() {
        let failure = BatchFailure {
            sample: "s".to_owned(),
            error: ResearchError::SampleNotFound {
                name: "s".to_owned(),
            },
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["error"], "sample 's' is not part of this study");
    }
}
