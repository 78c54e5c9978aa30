//! Logging setup for hosts embedding the object layer
//!
//! The library itself only emits `tracing` events. Hosts (the editor, test
//! harnesses, scripts) call [`init_logging`] once to install a subscriber.

use crate::core::config::{config_dir, Settings};
use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Prefix for rolling log files
const LOG_FILE_PREFIX: &str = "bezy-objects.log";

/// Get the path to the logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Get the path to today's log file
pub fn current_log_file() -> PathBuf {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d");
    logs_dir().join(format!("{}.{}", LOG_FILE_PREFIX, timestamp))
}

/// Initialize the logs directory
pub fn initialize_logs_directory() -> anyhow::Result<()> {
    fs::create_dir_all(logs_dir())?;
    Ok(())
}

/// Build the filter: `RUST_LOG` wins over the configured level
fn build_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level))
}

/// Install the global tracing subscriber.
///
/// Logs always go to stderr. With `log_to_file` set they are also written
/// to a daily rotating file under ~/.config/bezy/logs. The returned guard
/// must be kept alive for file output to be flushed.
pub fn init_logging(settings: &Settings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = build_filter(settings);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !settings.log_to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    }

    initialize_logs_directory()?;
    let file_appender = tracing_appender::rolling::daily(logs_dir(), LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .try_init()?;

    tracing::info!(
        "=== bezy-objects logging started at {} ===",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    tracing::info!("Logs written to: {:?}", current_log_file());

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_paths_live_under_config_dir() {
        let logs = logs_dir();
        assert!(logs.starts_with(config_dir()));

        let file = current_log_file();
        assert_eq!(file.parent(), Some(logs.as_path()));
        let name = file.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(LOG_FILE_PREFIX));
    }

    #[test]
    fn test_init_logging_twice_fails_cleanly() {
        let settings = Settings::default();
        // The first call may race with other tests that installed a
        // subscriber; either way the second call must report an error
        // instead of panicking.
        let _ = init_logging(&settings);
        assert!(init_logging(&settings).is_err());
    }
}
