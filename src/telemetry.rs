use crate::config::LogConfig;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter '{value}'")]
    EnvFilter { value: String, source: ParseError },
    #[error("opening log file {path:?}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("installing tracing subscriber: {0}")]
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. The terminal belongs to the UI, so events
/// go to the log file, uncoloured.
pub fn init(config: &LogConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|source| {
            TelemetryError::EnvFilter {
                value: config.filter.clone(),
                source,
            }
        })?,
    };

    if let Some(parent) = config.file.parent() {
        fs::create_dir_all(parent).map_err(|source| TelemetryError::LogFile {
            path: config.file.clone(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .map_err(|source| TelemetryError::LogFile {
            path: config.file.clone(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
