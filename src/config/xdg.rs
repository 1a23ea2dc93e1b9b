//! Where wdash keeps its files.
//!
//! `XDG_CONFIG_HOME` and `XDG_DATA_HOME` win on every platform. Without
//! them, Linux uses `~/.config` and `~/.local/share`, macOS uses
//! `~/Library/Application Support` for both. Each base gets a
//! `widget-dashboard` subdirectory.

use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "widget-dashboard";

/// File name of the TUI log inside the data directory.
pub const LOG_FILE_NAME: &str = "wdash.log";

/// Which base directory to resolve.
#[derive(Debug, Clone, Copy)]
enum Base {
    Config,
    Data,
}

impl Base {
    fn env_var(self) -> &'static str {
        match self {
            Base::Config => "XDG_CONFIG_HOME",
            Base::Data => "XDG_DATA_HOME",
        }
    }

    #[cfg(target_os = "macos")]
    fn platform_default(self) -> PathBuf {
        let native = match self {
            Base::Config => dirs::config_dir(),
            Base::Data => dirs::data_dir(),
        };
        native.unwrap_or_else(|| home().join("Library/Application Support"))
    }

    #[cfg(not(target_os = "macos"))]
    fn platform_default(self) -> PathBuf {
        match self {
            Base::Config => home().join(".config"),
            Base::Data => home().join(".local/share"),
        }
    }

    fn app_dir(self) -> PathBuf {
        let base = std::env::var_os(self.env_var())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| self.platform_default());
        base.join(APP_DIR)
    }
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Directory holding `config.toml`.
pub fn config_dir() -> PathBuf {
    Base::Config.app_dir()
}

/// Default configuration file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Directory holding saved dashboards and the TUI log.
pub fn data_dir() -> PathBuf {
    Base::Data.app_dir()
}

/// Replaces a leading `~` or `~/` with the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some("") => home(),
        Some(rest) if rest.starts_with('/') => home().join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

/// `mkdir -p` that leaves the directory readable by its owner only.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}
