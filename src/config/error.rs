//! Errors raised while locating, reading, writing or checking `config.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration failure. Every variant names the file or key involved.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read {path}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`](super::schema::Config).
    #[error("{path}:{line}:{column}: {message}")]
    Parse {
        /// File holding the error.
        path: PathBuf,
        /// One-based line, 0 when the parser gave no position.
        line: usize,
        /// One-based column, 0 when the parser gave no position.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// A file passed with `--config` does not exist.
    #[error("configuration file not found: {path}")]
    Missing {
        /// Requested path.
        path: PathBuf,
    },

    /// `config init` without `--force` found a file in place.
    #[error("{path} already exists (pass --force to replace it)")]
    Exists {
        /// Existing file.
        path: PathBuf,
    },

    /// Writing the template or its backup failed.
    #[error("cannot write {path}")]
    Write {
        /// Target of the write.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The effective configuration could not be rendered as TOML.
    #[error("cannot render configuration: {0}")]
    Render(String),

    /// A value parsed but cannot be used.
    #[error("{key} = {value:?} is invalid: {reason}")]
    Invalid {
        /// Dotted key such as `tui.tick_rate`.
        key: &'static str,
        /// The value as written.
        value: String,
        /// What was expected instead.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn io_variants_keep_path_and_source() {
        let read = ConfigError::Read {
            path: PathBuf::from("/etc/wdash/config.toml"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(read.to_string(), "cannot read /etc/wdash/config.toml");
        assert!(read.source().is_some());

        let write = ConfigError::Write {
            path: PathBuf::from("/tmp/config.toml"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(write.to_string().ends_with("/tmp/config.toml"));
        assert!(write.source().is_some());
    }

    #[test]
    fn parse_error_reads_like_a_compiler_location() {
        let err = ConfigError::Parse {
            path: PathBuf::from("config.toml"),
            line: 5,
            column: 12,
            message: "expected `=`".to_string(),
        };
        assert_eq!(err.to_string(), "config.toml:5:12: expected `=`");
    }

    #[test]
    fn exists_mentions_force() {
        let err = ConfigError::Exists {
            path: PathBuf::from("config.toml"),
        };
        assert!(err.to_string().contains("already exists"));
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn invalid_quotes_the_value() {
        let err = ConfigError::Invalid {
            key: "tui.tick_rate",
            value: "soon".to_string(),
            reason: "expected a duration like \"250ms\"".to_string(),
        };
        assert!(err.to_string().starts_with("tui.tick_rate = \"soon\" is invalid"));
    }
}
