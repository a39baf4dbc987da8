//! Error types for loading inputs and external data

use std::path::PathBuf;

/// Errors raised at the data-ingestion boundary.
///
/// The projection engine itself never fails: degenerate inputs degrade to
/// zero or "not reached" outputs. Only file, CSV and JSON handling can error.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record lacked a field that has no sensible default
    #[error("record {record} is missing required field `{field}`")]
    MissingField { field: &'static str, record: usize },

    #[error("invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}

impl ProjectionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for ingestion operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
