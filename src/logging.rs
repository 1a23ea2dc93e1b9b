//! Logging initialization for wdash.
//!
//! Configures the `tracing` subscriber with level filtering via the `WDASH_LOG`
//! environment variable. Falls back to the configured level when the variable
//! is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Default (config level, usually info)
//! wdash tui
//!
//! # Debug level
//! WDASH_LOG=debug wdash tui
//!
//! # Module-specific filtering
//! WDASH_LOG=widget_dashboard::grid=trace,warn wdash tui
//! ```

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "WDASH_LOG";

/// Builds the filter: `WDASH_LOG` when valid, else `default_level`.
pub fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the tracing subscriber.
///
/// With `log_file`, output is appended to that file; the TUI uses this since
/// stderr would tear the alternate screen. Otherwise output goes to stderr.
///
/// A second call is a no-op. Returns an error only when the log file cannot
/// be opened.
pub fn init(default_level: &str, log_file: Option<&Path>) -> std::io::Result<()> {
    let builder = fmt()
        .with_env_filter(filter(default_level))
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                crate::config::xdg::ensure_dir(parent)?;
            }
            let file = open_log_file(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
