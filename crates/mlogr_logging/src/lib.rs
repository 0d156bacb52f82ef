//! Logging setup for the mlogr binary.
//!
//! Two layers are installed: a daily rolling file under the mlogr home
//! directory and a stderr console layer. The console layer is off unless
//! debug output was requested; user-facing messages are written by the
//! binary itself and must not be interleaved with log lines.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "mlogr=info,mlogr_db=info,mlogr_schema=info";
const DEBUG_LOG_FILTER: &str = "mlogr=debug,mlogr_db=debug,mlogr_schema=debug";
const QUIET_CONSOLE_FILTER: &str = "off";

/// Environment variable overriding the mlogr home directory.
pub const HOME_ENV: &str = "MLOGR_HOME";

/// Logging configuration for the mlogr binary.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    pub debug: bool,
}

/// Initialize tracing with a rolling file writer and stderr output.
///
/// A log directory that cannot be created is reported on stderr and the
/// file layer is skipped; console logging is always installed.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let file_filter = if config.debug {
        EnvFilter::new(DEBUG_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    let file_layer = match ensure_logs_dir() {
        Ok(dir) => {
            let file_name = format!("{}.log", sanitize_name(config.app_name));
            let appender = tracing_appender::rolling::daily(dir, file_name);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(appender)
                    .with_ansi(false)
                    .with_filter(file_filter),
            )
        }
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {:#}", err);
            None
        }
    };

    let console_filter = EnvFilter::new(console_directive(config.debug));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Filter directive used for the console layer.
pub fn console_directive(debug: bool) -> &'static str {
    if debug {
        DEBUG_LOG_FILTER
    } else {
        QUIET_CONSOLE_FILTER
    }
}

/// Get the mlogr home directory: ~/.mlogr
///
/// Falls back to `.mlogr` in the working directory when no home directory
/// can be determined.
pub fn mlogr_home() -> PathBuf {
    if let Ok(override_path) = std::env::var(HOME_ENV) {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .map(|home| home.join(".mlogr"))
        .unwrap_or_else(|| PathBuf::from(".mlogr"))
}

/// Get the logs directory: ~/.mlogr/logs
pub fn logs_dir() -> PathBuf {
    logs_dir_in(&mlogr_home())
}

fn logs_dir_in(home: &Path) -> PathBuf {
    home.join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
