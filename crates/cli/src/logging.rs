use anyhow::{Context, Result};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Mirrors every event to stdout and to `log_file`, one plain line each.
/// The file is truncated at start. `RUST_LOG` overrides the default `info`.
pub fn init(log_file: &Path) -> Result<()> {
    if let Some(dir) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("could not create log directory: {}", dir.display()))?;
    }
    let file = File::create(log_file)
        .with_context(|| format!("could not create log file: {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(false);
    let run_log = fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(run_log)
        .try_init()
        .context("could not install the log subscriber")?;
    Ok(())
}
