// Logging setup: human-readable lines to stdout and to an append-only file.
// `RUST_LOG` picks the level, defaulting to info.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Cannot open log file {path}: {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },
    #[error("Logging was already initialised: {0}")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub fn subscriber(log_file: &Path) -> Result<impl Subscriber + Send + Sync, TelemetryError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| TelemetryError::LogFile {
            path: log_file.display().to_string(),
            source,
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    Ok(Registry::default()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))))
}

pub fn init(log_file: &Path) -> Result<(), TelemetryError> {
    tracing::subscriber::set_global_default(subscriber(log_file)?)?;
    Ok(())
}
