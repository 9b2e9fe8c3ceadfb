//! Error taxonomy for the baseline/diff engine.

use std::path::PathBuf;

/// Result type for monitor operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Errors produced by the core components.
///
/// Per-file errors (`NotFound`, `Io`, `UnsupportedAlgorithm`) are recovered
/// by the scan loop: the file is logged and skipped. `Storage` errors are
/// fatal to the enclosing operation and are never retried.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("baseline store error: {0}")]
    Storage(#[from] rusqlite::Error),
}
