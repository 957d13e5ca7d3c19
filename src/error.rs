//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for pruner operations.
pub type Result<T> = std::result::Result<T, PrunerError>;

/// Errors returned by pruner operations.
///
/// Network failures during a run never show up here: a failed DoH query or
/// HTTP probe only removes evidence for one entry. These variants cover the
/// setup and I/O steps around a run.
#[derive(Debug, Error)]
pub enum PrunerError {
    /// Filesystem I/O failed while reading, writing or backing up a list.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocklist to prune does not exist.
    #[error("blocklist not found at {}", path.display())]
    SourceNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Invalid configuration values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The shared HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl PrunerError {
    /// Returns `true` if the run failed because the source list is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }
}
