mod logging;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use media_dater_core::{
    app_paths, load_config, run, ExifTool, FilenameDateExtractor, RunOptions, RunStats,
    UnrecognizedLog, YearRange,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "media-dater", version)]
#[command(about = "Writes the date found in photo and video file names into their metadata")]
struct Cli {
    /// Directory to process
    directory: PathBuf,
    /// Folder to exclude (relative or absolute path)
    exclude: Option<PathBuf>,
    /// Move files into YYYY/MM (default: only update metadata)
    #[arg(long, visible_alias = "move", default_value_t = false)]
    organize: bool,
    /// Log intended actions without touching any file
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(long)]
    log_file: Option<PathBuf>,
    #[arg(long)]
    unrecognized_file: Option<PathBuf>,
    /// Append to the unrecognized list instead of clearing it
    #[arg(long, default_value_t = false)]
    keep_unrecognized: bool,
    #[arg(long)]
    exiftool: Option<String>,
    /// Only accept years 2001-2025
    #[arg(long, default_value_t = false)]
    strict_years: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if !cli.directory.is_dir() {
        bail!("{} is not a valid directory", cli.directory.display());
    }

    let config = load_config()?;
    let paths = app_paths()?;

    let log_path = cli
        .log_file
        .or(config.log_file)
        .unwrap_or(paths.log_path);
    logging::init(&log_path)?;

    let unrecognized_path = cli
        .unrecognized_file
        .or(config.unrecognized_file)
        .unwrap_or(paths.unrecognized_path);
    let clear = config.clear_unrecognized_on_start && !cli.keep_unrecognized;
    let unrecognized = UnrecognizedLog::open(unrecognized_path, clear)?;

    let years = if cli.strict_years {
        YearRange::STRICT
    } else {
        config.year_range.range()
    };
    let extractor = FilenameDateExtractor::new(years);
    let writer = ExifTool::new(cli.exiftool.unwrap_or(config.exiftool_path));

    let options = RunOptions {
        root: cli.directory,
        exclude: cli.exclude,
        organize: cli.organize,
        dry_run: cli.dry_run,
    };
    let stats = run(options, &extractor, &writer, &unrecognized)?;
    info!("Log saved at: {}", log_path.display());

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => print_table(&stats),
    }

    Ok(())
}

fn print_table(stats: &RunStats) {
    println!(
        "\nsummary: files={} recognized={} unrecognized={} unsupported={} excluded={}",
        stats.total_files,
        stats.recognized,
        stats.unrecognized,
        stats.skipped_unsupported,
        stats.excluded
    );
    println!(
        "metadata: written={} failed={} converted={} mtime={} invalid_date={}",
        stats.metadata_written,
        stats.metadata_failed,
        stats.converted,
        stats.mtime_updated,
        stats.invalid_datetime
    );
    println!(
        "placement: moved={} failed={} in_place={}",
        stats.moved, stats.move_failed, stats.already_in_place
    );
}
