use anyhow::Result;
use clap::Parser;
use media_dater_core::{apply_session, parse_base_datetime, plan_session};
use std::path::PathBuf;

/// Renames undated photos to YYYYMMDD_HHMMSS, one second apart, in name order.
#[derive(Debug, Parser)]
#[command(name = "rename-session", version)]
struct Cli {
    /// Folder to process (not recursive)
    folder: PathBuf,
    /// Base date and time, YYYY-MM-DD-hh-mm-ss
    datetime: String,
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_level(false)
        .init();

    let base = parse_base_datetime(&cli.datetime)?;
    let plan = plan_session(&cli.folder, base)?;
    let result = apply_session(&plan, cli.dry_run);

    eprintln!(
        "renamed={} simulated={} skipped={} failed={}",
        result.renamed, result.simulated, result.skipped, result.failed
    );
    Ok(())
}
