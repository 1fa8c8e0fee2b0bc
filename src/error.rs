//! Error types for the library surface.
//!
//! Surrogate failures are not here: they never leave the evaluator (see
//! [`crate::eval::SurrogateError`]).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonasError {
    #[error("unknown hardware profile '{name}' (available: {})", .available.join(", "))]
    UnknownHardwareProfile { name: String, available: Vec<String> },

    #[error("invalid hardware profile '{name}': {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid bound '{key}': {value} is not a number")]
    InvalidBound { key: String, value: f64 },

    #[error("invalid objective '{0}': expected <metric>=<weight>")]
    InvalidObjective(String),

    #[error("unknown metric '{0}' (expected accuracy, latency, params or flops)")]
    UnknownMetric(String),

    #[error("invalid search space: {0}")]
    InvalidSearchSpace(String),
}

pub type Result<T> = std::result::Result<T, MonasError>;

impl MonasError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
