/// Error type shared by every fallible operation in the crate.
///
/// Missing index rows are never errors; only collaborator failures
/// (filesystem, resolver, report writers) surface here.
use std::path::PathBuf;

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, CleanerError>;

#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to resolve dependencies of {id}: {details}")]
    Resolve { id: String, details: String },

    #[error("configuration parse failure in {path}: {details}")]
    ConfigParse { path: PathBuf, details: String },

    #[error("directory walk failed: {details}")]
    Walk { details: String },

    #[error("report generation failed: {details}")]
    Report { details: String },
}

impl CleanerError {
    /// Convenience constructor used wherever a path-bound IO call fails.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for CleanerError {
    fn from(err: csv::Error) -> Self {
        Self::Report {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Report {
            details: err.to_string(),
        }
    }
}
