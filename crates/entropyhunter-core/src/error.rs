//! Error type shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by every fallible operation in the crate.
pub type Result<T, E = HunterError> = std::result::Result<T, E>;

/// Failures surfaced by the analysis, generation and prediction APIs.
///
/// Empty corpora are deliberately not represented here: analyzing nothing
/// yields an empty summary and generating from nothing yields empty strings.
#[derive(Debug, Error)]
pub enum HunterError {
    /// A numeric or structural parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A configuration document failed to parse or validate.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Filesystem IO error with the path that triggered it, when known.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
}

impl HunterError {
    /// Shorthand for [`HunterError::InvalidParameter`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Wrap an IO error, attaching the path being processed.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }
}

impl From<serde_json::Error> for HunterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
