use std::io::{self, Write};

use clap::Args;
use shastra_research::session::{BatchReport, SampleComparison};

use super::{BatchArg, ReportArg, ResearchArg};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    pub research: ResearchArg,
    /// Parameter to compare (default: every registered parameter)
    #[arg(long)]
    pub parameter: Option<String>,
    /// Compare the main sample against this control only
    #[arg(long)]
    pub control: Option<String>,
    #[clap(flatten)]
    pub batch: BatchArg,
    #[clap(flatten)]
    pub report: ReportArg,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let mut session = arg.research.load()?;
    let mut config = *session.config();
    arg.batch.apply(&mut config);
    session.set_config(config);

    let main = session.main_sample().name().to_owned();
    let mut reports = vec![];
    for parameter in super::selected_parameters(&session, arg.parameter.as_deref()) {
        eprintln!("Comparing {parameter} distributions...");
        let report = match &arg.control {
            Some(control) => BatchReport {
                entries: vec![session.compare_samples(&main, control, &parameter)?],
                failures: vec![],
                parameter,
            },
            None => session.compare_all(&parameter)?,
        };
        reports.push(report);
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

fn write_report<W>(out: &mut W, report: &BatchReport<SampleComparison>) -> io::Result<()>
where
    W: Write,
{
    writeln!(out, "Comparisons for {}", report.parameter)?;
    writeln!(
        out,
        "  {:<30} {:>10} {:>12} {:>10} {:>12}",
        "Samples", "KS D", "KS p", "AD T", "AD signif.",
    )?;
    // label(30) + ks(10) + p(12) + ad(10) + signif(12) + spaces(4)
    writeln!(out, "  {}", "-".repeat(78))?;
    for entry in &report.entries {
        let result = &entry.result;
        writeln!(
            out,
            "  {:<30} {:>10.4} {:>12.4e} {:>10.4} {:>12.4}",
            format!("{} vs {}", entry.first, entry.second),
            result.ks_statistic,
            result.ks_p_value,
            result.ad_statistic,
            result.ad_significance_level,
        )?;
        for (sample, omitted) in [
            (&entry.first, entry.omitted_nan_first),
            (&entry.second, entry.omitted_nan_second),
        ] {
            if omitted > 0 {
                writeln!(out, "    note: {sample}: {omitted} NaN values omitted")?;
            }
        }
        for warning in &result.warnings {
            writeln!(out, "    warning: {warning}")?;
        }
    }
    let degenerate = report
        .entries
        .iter()
        .filter(|e| e.result.is_degenerate())
        .count();
    if degenerate > 0 {
        writeln!(
            out,
            "  {degenerate} of {} comparisons involve a constant sample",
            report.entries.len()
        )?;
    }
    for failure in &report.failures {
        writeln!(out, "  skipped {}: {}", failure.sample, failure.error)?;
    }
    writeln!(out)
}
