//! Error type for report persistence.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReportStoreError {
    /// Filesystem errors, with the path that failed.
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report (de)serialization.
    #[error("report json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a report with session id {0} already exists")]
    Duplicate(Uuid),

    #[error("unknown report store backend: {0}")]
    UnknownBackend(String),
}

impl ReportStoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
