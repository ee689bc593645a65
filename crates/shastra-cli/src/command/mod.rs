use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shastra_catalog::table::Catalog;
use shastra_research::{
    config::{BatchPolicy, ResearchConfig},
    session::ResearchSession,
};

use crate::{schema::ResearchDefinition, util::Output};

use self::{
    compare::CompareArg, describe::DescribeArg, histogram::HistogramArg,
    statistics::StatisticsArg, values::ValuesArg,
};

mod compare;
mod describe;
mod histogram;
mod statistics;
mod values;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Mean, median and standard deviation with bootstrap uncertainty
    Statistics(#[clap(flatten)] StatisticsArg),
    /// Compare the main sample against every control (KS and Anderson-Darling)
    Compare(#[clap(flatten)] CompareArg),
    /// Equal-width histograms of the main sample and controls
    Histogram(#[clap(flatten)] HistogramArg),
    /// Print the catalog, samples and parameters of a research definition
    Describe(#[clap(flatten)] DescribeArg),
    /// Print the raw values of a parameter for one sample
    Values(#[clap(flatten)] ValuesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Statistics(arg) => statistics::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Histogram(arg) => histogram::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Values(arg) => values::run(&arg)?,
    }
    Ok(())
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ResearchArg {
    /// Path to the research definition JSON file
    pub research: PathBuf,
}

impl ResearchArg {
    pub fn load(&self) -> anyhow::Result<ResearchSession<Catalog>> {
        ResearchDefinition::read(&self.research)?.into_session()
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct ReportArg {
    /// Write JSON instead of a text report
    #[arg(long)]
    pub json: bool,
    /// Output file path (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ReportArg {
    pub fn output(&self) -> anyhow::Result<Output> {
        Output::from_output_path(self.output.as_deref())
    }
}

#[derive(Debug, Clone, Args)]
pub(crate) struct BatchArg {
    /// Record failing samples and continue instead of aborting
    #[arg(long)]
    pub skip_failures: bool,
}

impl BatchArg {
    pub fn apply(&self, config: &mut ResearchConfig) {
        if self.skip_failures {
            config.batch_policy = BatchPolicy::SkipFailures;
        }
    }
}

/// Names of the parameters to process: the one given, or every registered
/// parameter.
pub(crate) fn selected_parameters(
    session: &ResearchSession<Catalog>,
    parameter: Option<&str>,
) -> Vec<String> {
    match parameter {
        Some(name) => vec![name.to_owned()],
        None => session.parameters().names().map(str::to_owned).collect(),
    }
}
