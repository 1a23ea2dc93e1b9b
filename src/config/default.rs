//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()`
//! and functions to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Widget Dashboard Configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/widget-dashboard/config.toml

# ==============================================================================
# TUI
# ==============================================================================

[tui]

# Render tick rate as a human-readable duration.
# Examples: "100ms", "250ms", "1s"
tick_rate = "250ms"

# Height of one grid row in terminal lines. Minimum 3.
row_height = 5

# ==============================================================================
# Grid breakpoints
# ==============================================================================

# Minimum terminal width (columns) for each breakpoint.
# lg = 12 grid columns, md = 10, sm = 6, xs = 4, narrower = 2.
# Only lg edits are saved; narrower layouts are display-only.
[grid]
lg = 120
md = 100
sm = 77
xs = 48

# ==============================================================================
# Storage
# ==============================================================================

[storage]

# Directory for saved dashboards. Empty means $XDG_DATA_HOME/widget-dashboard.
# Tilde (~) is expanded to the user's home directory.
data_dir = ""

# ==============================================================================
# Notifications
# ==============================================================================

[notifications]

# How long notifications stay visible. "0s" keeps them until dismissed.
duration = "5s"

# ==============================================================================
# Data source
# ==============================================================================

[data]

# Simulated fetch latency.
latency = "500ms"

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Options: "error", "warn", "info", "debug", "trace"
# The WDASH_LOG environment variable overrides this.
level = "info"

# Log file used while the dashboard owns the terminal.
# Empty means wdash.log in the data directory.
file = ""
"#;

/// Writes [`DEFAULT_CONFIG_TEMPLATE`] to the XDG config path and returns it.
///
/// An existing file is an error unless `force` is set, in which case it is
/// first renamed to `config.toml.backup`.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();
    if path.exists() {
        if !force {
            return Err(ConfigError::Exists { path });
        }
        let backup = path.with_extension("toml.backup");
        fs::rename(&path, &backup).map_err(|source| ConfigError::Write {
            path: backup.clone(),
            source,
        })?;
        tracing::info!("previous config kept at {}", backup.display());
    }
    write_template(&path).map_err(|source| ConfigError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Template write with a private (0600) file mode.
fn write_template(path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        xdg::ensure_dir(dir)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
