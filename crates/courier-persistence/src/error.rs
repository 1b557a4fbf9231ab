//! Error types for the persistence crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while persisting or reloading credentials.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Failed to create the store directory.
    #[error("failed to create directory {path}: {source}")]
    Directory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write the bundle file.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Target file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to read the bundle file.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Source file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Bundle could not be serialized or parsed.
    #[error("credential serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
