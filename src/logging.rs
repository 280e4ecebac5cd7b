//! Logging setup. Grounded on the daemon crate's `setup_logging`, extended
//! with a second stdout layer so `--log` augments rather than replaces
//! console output (stdout logging is always-on; `--log` is an addition).

use crate::error::StartupError;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the global tracing subscriber. Returns a guard that must be
/// held for the lifetime of the process when a file layer was installed;
/// dropping it flushes the non-blocking file writer.
pub fn init(log_path: Option<&Path>) -> Result<Option<WorkerGuard>, StartupError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_path {
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
            Ok(None)
        }
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StartupError::LoggingSetup(format!("creating log directory: {e}"))
                })?;
            }
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| StartupError::LoggingSetup(format!("invalid --log path {}", path.display())))?;

            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();

            Ok(Some(guard))
        }
    }
}
