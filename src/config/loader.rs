//! Reads `config.toml` into a validated [`Config`].
//!
//! An explicit path must exist. The default XDG path may be absent, in
//! which case the built-in defaults apply. Parse errors carry the line and
//! column of the offending token.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Parses the file at `path` without validating values.
    ///
    /// A missing file is [`ConfigError::Missing`]; any other I/O failure is
    /// [`ConfigError::Read`].
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse_toml(&content, path)
    }

    /// Parses the default file, or returns the defaults when there is none.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load_from_path(&path)
    }

    /// Loads `path` (or the default file) and validates every value.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config = match path {
            Some(p) => Self::load_from_path(p)?,
            None => Self::load_default()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Deserializes `content`, mapping the error span to a line and column.
    fn parse_toml(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map(|span| line_column(content, span.start))
                .unwrap_or((0, 0));
            ConfigError::Parse {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

/// 1-based line and column of byte `offset` in `content`.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
    (line, before.len() - line_start + 1)
}
