use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::OutputPaths;

/// Keeps the background writer alive; dropping it flushes the telemetry file.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Installs a JSON subscriber writing to `telemetry.jsonl` in the run directory.
/// `RUST_LOG` overrides `level` when set.
pub fn init_logging(
    level: Option<Level>,
    paths: &OutputPaths,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    let Some(level) = level else {
        return Ok(None);
    };

    fs::create_dir_all(&paths.dir)
        .with_context(|| format!("creating run directory at {}", paths.dir.display()))?;

    let telemetry_path = paths.telemetry();
    let file = File::create(&telemetry_path)
        .with_context(|| format!("creating telemetry file at {}", telemetry_path.display()))?;

    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    // A global subscriber may already be installed (tests, embedding binaries).
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!(
        target: "kittens_bench::run",
        run_id,
        level = level.as_str(),
        "structured logging enabled"
    );

    Ok(Some(LoggingGuard {
        _guard: guard,
        telemetry_path,
    }))
}
