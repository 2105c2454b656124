mod convert;
mod lrp;
mod options;
mod pattern;
mod plan;
mod progress;
mod qth;
mod report;
mod sweep;
mod udt;

use anyhow::Result;
use clap::Parser;
use options::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli {
        Cli::Coverage(coverage) => coverage.run(),
        Cli::Loss(loss) => loss.run(),
        Cli::Report(report) => report.run(),
        Cli::Convert(convert) => convert.run(),
    }
}
