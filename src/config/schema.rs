//! TOML configuration schema types for the widget dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial or empty file is valid.
//!
//! Duration fields use human-readable strings (e.g. `"250ms"`, `"5s"`)
//! parsed by the `humantime` crate through the typed accessors below.

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::layout::Breakpoints;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Log levels accepted by `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Smallest usable grid row height in terminal lines (border, title, body).
pub const MIN_ROW_HEIGHT: u16 = 3;

/// Longest duration any setting accepts.
pub const MAX_DURATION: Duration = Duration::from_secs(365 * 24 * 60 * 60);

fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    };
    let parsed = humantime::parse_duration(value).map_err(|e| invalid(e.to_string()))?;
    if parsed > MAX_DURATION {
        return Err(invalid("must be at most one year".to_string()));
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// ```toml
/// [tui]
/// [grid]
/// [storage]
/// [notifications]
/// [data]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terminal UI behavior.
    pub tui: TuiConfig,
    /// Responsive grid breakpoints.
    pub grid: GridConfig,
    /// Where dashboards are saved.
    pub storage: StorageConfig,
    /// Notification display.
    pub notifications: NotificationsConfig,
    /// Simulated data source.
    pub data: DataConfig,
    /// Log verbosity and destination.
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks every value that parses but may still be unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tui.tick_rate()?;
        self.tui.row_height()?;
        self.grid.breakpoints()?;
        self.notifications.duration()?;
        self.data.latency()?;
        self.logging.level()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TUI
// ---------------------------------------------------------------------------

/// Terminal UI settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TuiConfig {
    /// Render tick rate as a human-readable duration (e.g. `"250ms"`).
    pub tick_rate: String,
    /// Height of one grid row in terminal lines.
    pub row_height: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate: "250ms".to_string(),
            row_height: 5,
        }
    }
}

impl TuiConfig {
    /// Parsed tick rate. Zero is rejected.
    pub fn tick_rate(&self) -> Result<Duration, ConfigError> {
        let rate = parse_duration("tui.tick_rate", &self.tick_rate)?;
        if rate.is_zero() {
            return Err(ConfigError::Invalid {
                key: "tui.tick_rate",
                value: self.tick_rate.clone(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(rate)
    }

    /// Row height, at least [`MIN_ROW_HEIGHT`].
    pub fn row_height(&self) -> Result<u16, ConfigError> {
        if self.row_height < MIN_ROW_HEIGHT {
            return Err(ConfigError::Invalid {
                key: "tui.row_height",
                value: self.row_height.to_string(),
                reason: format!("must be at least {MIN_ROW_HEIGHT}"),
            });
        }
        Ok(self.row_height)
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Minimum terminal widths of the responsive breakpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Minimum width of `lg` (12 columns).
    pub lg: u16,
    /// Minimum width of `md` (10 columns).
    pub md: u16,
    /// Minimum width of `sm` (6 columns).
    pub sm: u16,
    /// Minimum width of `xs` (4 columns); narrower is `xxs` (2 columns).
    pub xs: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        let bps = Breakpoints::default();
        Self {
            lg: bps.lg,
            md: bps.md,
            sm: bps.sm,
            xs: bps.xs,
        }
    }
}

impl GridConfig {
    /// Breakpoints, which must be strictly decreasing from `lg` to `xs`.
    pub fn breakpoints(&self) -> Result<Breakpoints, ConfigError> {
        if !(self.lg > self.md && self.md > self.sm && self.sm > self.xs) {
            return Err(ConfigError::Invalid {
                key: "grid",
                value: format!("lg={} md={} sm={} xs={}", self.lg, self.md, self.sm, self.xs),
                reason: "breakpoints must decrease from lg to xs".to_string(),
            });
        }
        Ok(Breakpoints {
            lg: self.lg,
            md: self.md,
            sm: self.sm,
            xs: self.xs,
        })
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Persistence settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for saved dashboards. Empty means the XDG data directory.
    /// Tilde (`~`) is expanded.
    pub data_dir: String,
}

impl StorageConfig {
    /// Effective data directory.
    pub fn resolve_dir(&self) -> PathBuf {
        if self.data_dir.trim().is_empty() {
            xdg::data_dir()
        } else {
            xdg::expand_tilde(self.data_dir.trim())
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Notification settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Default display duration. `"0s"` keeps notifications until dismissed.
    pub duration: String,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            duration: "5s".to_string(),
        }
    }
}

impl NotificationsConfig {
    /// Parsed default duration.
    pub fn duration(&self) -> Result<Duration, ConfigError> {
        parse_duration("notifications.duration", &self.duration)
    }
}

// ---------------------------------------------------------------------------
// Data
// ---------------------------------------------------------------------------

/// Simulated data source settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Delay before each fetch answers.
    pub latency: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            latency: "500ms".to_string(),
        }
    }
}

impl DataConfig {
    /// Parsed latency.
    pub fn latency(&self) -> Result<Duration, ConfigError> {
        parse_duration("data.latency", &self.latency)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging settings. `WDASH_LOG` overrides `level`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level: one of [`LOG_LEVELS`].
    pub level: String,
    /// Log file used while the TUI owns the terminal. Empty means
    /// `wdash.log` in the data directory.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: String::new(),
        }
    }
}

impl LoggingConfig {
    /// Validated, lowercased level.
    pub fn level(&self) -> Result<String, ConfigError> {
        let level = self.level.trim().to_lowercase();
        if LOG_LEVELS.contains(&level.as_str()) {
            Ok(level)
        } else {
            Err(ConfigError::Invalid {
                key: "logging.level",
                value: self.level.clone(),
                reason: format!("expected one of {}", LOG_LEVELS.join(", ")),
            })
        }
    }

    /// Log file for TUI sessions, given the effective data directory.
    pub fn resolve_file(&self, data_dir: &std::path::Path) -> PathBuf {
        if self.file.trim().is_empty() {
            data_dir.join(xdg::LOG_FILE_NAME)
        } else {
            xdg::expand_tilde(self.file.trim())
        }
    }
}
