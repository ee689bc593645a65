use std::io::Write as _;

use clap::Args;

use super::{ReportArg, ResearchArg};

#[derive(Debug, Clone, Args)]
pub(crate) struct ValuesArg {
    #[clap(flatten)]
    pub research: ResearchArg,
    /// Sample name (main sample or a control)
    #[arg(long)]
    pub sample: String,
    /// Parameter name
    #[arg(long)]
    pub parameter: String,
    #[clap(flatten)]
    pub report: ReportArg,
}

pub(crate) fn run(arg: &ValuesArg) -> anyhow::Result<()> {
    let session = arg.research.load()?;
    let values = session.get_values(&arg.sample, &arg.parameter)?;
    eprintln!("{} for {}: {} values", arg.parameter, arg.sample, values.len());

    let mut output = arg.report.output()?;
    if arg.report.json {
        output.write_json(&values)
    } else {
        output.write_report(|out| {
            for value in &values {
                writeln!(out, "{value}")?;
            }
            Ok(())
        })
    }
}
