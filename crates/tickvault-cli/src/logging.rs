//! Logging bootstrap.
//!
//! Daily-rotating file appender under the log directory, keeping the most
//! recent seven files, mirrored to the console. Constructed once at process
//! start; the returned [`WorkerGuard`] must stay alive for the program's
//! lifetime so buffered lines are flushed on exit.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const RETAINED_LOG_FILES: usize = 7;

pub fn init(log_dir: &Path) -> Result<WorkerGuard, crate::error::CliError> {
    fs::create_dir_all(log_dir)
        .map_err(|err| crate::error::CliError::Logging(err.to_string()))?;

    // Produces log.<YYYY-MM-DD>.log, rotated at midnight.
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("log")
        .filename_suffix("log")
        .max_log_files(RETAINED_LOG_FILES)
        .build(log_dir)
        .map_err(|err| crate::error::CliError::Logging(err.to_string()))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let console_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Ok(guard)
}
