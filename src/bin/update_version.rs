use anyhow::Result;
use clap::Parser;
use tracker_tools::cli::VersionArgs;
use tracker_tools::logging;
use tracker_tools::sync;

fn main() -> Result<()> {
    let args = VersionArgs::parse();
    logging::init(args.project.verbose);

    // Validate before touching the project so a bad --version never writes.
    let command = args.command()?;
    let paths = args.project.resolve()?;
    sync::run(&paths, command, args.json)
}
