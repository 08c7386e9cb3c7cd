use anyhow::Result;
use clap::Parser;
use tracker_tools::cleaner::{clean_project, render_entry, render_summary};
use tracker_tools::cli::CleanArgs;
use tracker_tools::emoji::EmojiTable;
use tracker_tools::logging;

fn main() -> Result<()> {
    let args = CleanArgs::parse();
    logging::init(args.project.verbose);

    let paths = args.project.resolve()?;
    let report = clean_project(&paths, &EmojiTable::firmware(), |entry| {
        if let Some(line) = render_entry(entry, &paths) {
            print!("{line}");
        }
    });
    print!("{}", render_summary(&report, &paths));
    Ok(())
}
