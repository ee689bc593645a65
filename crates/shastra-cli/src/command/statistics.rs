use std::io::{self, Write};

use clap::Args;
use shastra_research::session::{BatchReport, SampleStatistics};

use super::{BatchArg, ReportArg, ResearchArg};

#[derive(Debug, Clone, Args)]
pub(crate) struct StatisticsArg {
    #[clap(flatten)]
    pub research: ResearchArg,
    /// Parameter to report (default: every registered parameter)
    #[arg(long)]
    pub parameter: Option<String>,
    #[clap(flatten)]
    pub bootstrap: BootstrapArg,
    #[clap(flatten)]
    pub batch: BatchArg,
    #[clap(flatten)]
    pub report: ReportArg,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct BootstrapArg {
    /// Number of bootstrap resamples (overrides the research definition)
    #[arg(long)]
    pub resamples: Option<usize>,
    /// Seed for reproducible resampling (overrides the research definition)
    #[arg(long)]
    pub seed: Option<u64>,
    /// Run resamples on a single thread
    #[arg(long)]
    pub serial: bool,
}

pub(crate) fn run(arg: &StatisticsArg) -> anyhow::Result<()> {
    let mut session = arg.research.load()?;
    let mut config = *session.config();
    if let Some(resamples) = arg.bootstrap.resamples {
        config.bootstrap.resamples = resamples;
    }
    if let Some(seed) = arg.bootstrap.seed {
        config.bootstrap.seed = Some(seed);
    }
    if arg.bootstrap.serial {
        config.bootstrap.parallel = false;
    }
    arg.batch.apply(&mut config);
    session.set_config(config);

    let mut reports = vec![];
    for parameter in super::selected_parameters(&session, arg.parameter.as_deref()) {
        eprintln!(
            "Computing statistics for {parameter} ({} resamples)...",
            config.bootstrap.resamples
        );
        reports.push(session.statistics_for_all(&parameter)?);
    }

    let mut output = arg.report.output()?;
    if arg.report.json {
        output.write_json(&reports)
    } else {
        output.write_report(|out| {
            for report in &reports {
                write_report(out, report)?;
            }
            Ok(())
        })
    }
}

fn write_report<W>(out: &mut W, report: &BatchReport<SampleStatistics>) -> io::Result<()>
where
    W: Write,
{
    writeln!(out, "Statistics for {}", report.parameter)?;
    writeln!(
        out,
        "  {:<20} {:>8} {:>12} {:>10} {:>12} {:>10} {:>12} {:>10}",
        "Sample", "N", "Mean", "+-", "Median", "+-", "Std", "+-",
    )?;
    // label(20) + count(8) + 3 * (value(12) + error(10)) + spaces(7)
    writeln!(out, "  {}", "-".repeat(101))?;
    for entry in &report.entries {
        let interval = &entry.interval;
        writeln!(
            out,
            "  {:<20} {:>8} {:>12.4} {:>10.4} {:>12.4} {:>10.4} {:>12.4} {:>10.4}",
            entry.sample,
            entry.descriptive.count,
            entry.mean(),
            interval.std_mean,
            entry.median(),
            interval.std_median,
            entry.std(),
            interval.std_std,
        )?;
    }
    for entry in &report.entries {
        if entry.omitted_nan > 0 {
            writeln!(
                out,
                "  note: {}: {} NaN values omitted",
                entry.sample, entry.omitted_nan
            )?;
        }
        for warning in &entry.warnings {
            writeln!(out, "  warning: {}: {warning}", entry.sample)?;
        }
    }
    for failure in &report.failures {
        writeln!(out, "  skipped {}: {}", failure.sample, failure.error)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use shastra_stats::{StatsWarning, bootstrap::IntervalEstimate, descriptive::DescriptiveStats};

    use super::*;

    #[test]
    fn test_report_lists_warnings() {
        let report = BatchReport {
            parameter: "mass".to_owned(),
            entries: vec![SampleStatistics {
                sample: "flat".to_owned(),
                parameter: "mass".to_owned(),
                descriptive: DescriptiveStats::new([5.0, 5.0]).unwrap(),
                interval: IntervalEstimate {
                    std_mean: 0.0,
                    std_median: 0.0,
                    std_std: 0.0,
                },
                omitted_nan: 1,
                warnings: vec![StatsWarning::ConstantValues],
            }],
            failures: vec![],
        };
        let mut buf = vec![];
        write_report(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("  note: flat: 1 NaN values omitted\n"));
        assert!(text.contains(&format!(
            "  warning: flat: {}\n",
            StatsWarning::ConstantValues
        )));
    }
}
