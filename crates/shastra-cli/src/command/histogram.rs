use std::io::{self, Write};

use clap::Args;
use serde::Serialize;
use shastra_research::session::SampleHistogram;
use shastra_stats::histogram::{DEFAULT_BINS, HistogramConfig};

use super::{ReportArg, ResearchArg};
use crate::util;

const MAX_BAR_WIDTH: u64 = 50;

#[derive(Debug, Clone, Args)]
pub(crate) struct HistogramArg {
    #[clap(flatten)]
    pub research: ResearchArg,
    /// Parameter to plot (default: every registered parameter)
    #[arg(long)]
    pub parameter: Option<String>,
    /// Number of equal-width bins
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,
    /// Bin range as `lo,hi` (default: span of all samples)
    #[arg(long, value_parser = util::parse_range, allow_hyphen_values = true)]
    pub range: Option<(f64, f64)>,
    #[clap(flatten)]
    pub report: ReportArg,
}

#[derive(Debug, Serialize)]
struct ParameterHistograms {
    parameter: String,
    histograms: Vec<SampleHistogram>,
}

pub(crate) fn run(arg: &HistogramArg) -> anyhow::Result<()> {
    let session = arg.research.load()?;
    let config = HistogramConfig {
        bins: arg.bins,
        range: arg.range,
    };

    let mut plots = vec![];
    for parameter in super::selected_parameters(&session, arg.parameter.as_deref()) {
        eprintln!("Binning {parameter} into {} bins...", config.bins);
        let histograms = session.stacked_histograms(&parameter, &config)?;
        plots.push(ParameterHistograms {
            parameter,
            histograms,
        });
    }

    let mut output = arg.report.output()?;
    if arg.report.json {
        output.write_json(&plots)
    } else {
        output.write_report(|out| {
            for plot in &plots {
                write_histograms(out, plot)?;
            }
            Ok(())
        })
    }
}

fn write_histograms<W>(out: &mut W, plot: &ParameterHistograms) -> io::Result<()>
where
    W: Write,
{
    let max_count = plot
        .histograms
        .iter()
        .map(|h| h.histogram.max_count())
        .max()
        .unwrap_or(0)
        .max(1);
    for entry in &plot.histograms {
        writeln!(
            out,
            "{}: {} ({} values)",
            plot.parameter,
            entry.sample,
            entry.histogram.total()
        )?;
        for bin in &entry.histogram.bins {
            let label = format!("[{:.3}, {:.3})", bin.range.start, bin.range.end);
            let bar_width = usize::try_from(bin.count * MAX_BAR_WIDTH / max_count).unwrap_or(0);
            writeln!(out, "{:>24} | {:<5} {}", label, bin.count, "#".repeat(bar_width))?;
        }
        writeln!(out)?;
    }
    Ok(())
}
