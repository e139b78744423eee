//! Application logging functionality
//!
//! Installs the global `tracing` subscriber: formatted output on stderr and,
//! when enabled, a daily log file in ~/.config/glyphloop/logs/.

use crate::core::config_file::ConfigFile;
use crate::core::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    ConfigFile::config_dir().join("logs")
}

/// File name of today's log
pub fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    format!("glyphloop-{}.log", timestamp)
}

/// Get the path to the current log file
pub fn current_log_file() -> PathBuf {
    logs_dir().join(log_file_name())
}

/// Initialize the logs directory
pub fn initialize_logs_directory(logs_dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir)?;
    Ok(())
}

/// Filter from `RUST_LOG` if set, otherwise from the settings
pub fn env_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.log_filter()))
}

/// Install the global subscriber.
///
/// Returns the file writer guard when file logging is on; buffered lines are
/// flushed when it is dropped. Fails if a global subscriber is already set.
pub fn init_tracing(settings: &Settings) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, guard) = if settings.log_to_file {
        let dir = logs_dir();
        initialize_logs_directory(&dir)?;
        let appender = tracing_appender::rolling::never(&dir, log_file_name());
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    if guard.is_some() {
        tracing::info!(
            "=== glyphloop started at {}, logging to {:?} ===",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            current_log_file()
        );
    }
    Ok(guard)
}
