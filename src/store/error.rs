//! Storage error types for the dashboard blob store.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing persisted dashboard state.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing a blob file failed.
    #[error("Failed to access storage at {path}")]
    Io {
        /// Path of the blob file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The dashboard state could not be serialized.
    #[error("Failed to encode dashboard state")]
    Encode(#[source] serde_json::Error),

    /// The stored blob is not valid dashboard state.
    #[error("Invalid dashboard state: {0}")]
    Decode(String),

    /// The stored blob was written by a newer schema.
    #[error("Unsupported dashboard state version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version found in the blob.
        found: u32,
        /// Newest version this build understands.
        supported: u32,
    },

    /// Renaming the temporary file over the blob failed.
    #[error("Failed to write storage atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path to the blob file.
        path: PathBuf,
        /// Path to the temporary safety copy.
        temp_path: PathBuf,
    },
}
