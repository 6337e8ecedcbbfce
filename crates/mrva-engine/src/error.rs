//! Engine error types.

use std::path::PathBuf;

use mrva_client::ClientError;
use mrva_store::StoreError;
use thiserror::Error;

/// Errors that abort a whole engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The named session is not in the store.
    #[error("Session '{name}' does not exist")]
    NotFound { name: String },

    /// No stored session contains this run.
    #[error("No session contains run {run_id}")]
    RunNotFound { run_id: u64 },

    /// Submission under a name that is already taken.
    #[error("Session '{name}' already exists")]
    AlreadyExists { name: String },

    /// A run has not finished yet; nothing was downloaded.
    #[error("Run {run_id} is still in progress, try again later")]
    NotReady { run_id: u64 },

    /// The session would not pass validation; rejected before submitting.
    #[error(transparent)]
    Invalid(#[from] mrva_core::CoreError),

    /// Submission with no repositories or no queries.
    #[error("nothing to submit: {0}")]
    NothingToSubmit(&'static str),

    /// Any failure talking to the controller.
    #[error("remote call failed: {0}")]
    Remote(#[from] ClientError),

    /// Session store failure other than a missing or duplicate name.
    #[error(transparent)]
    Store(StoreError),

    /// The output directory could not be prepared.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A download worker panicked.
    #[error("download worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { name } => Self::NotFound { name },
            StoreError::AlreadyExists { name } => Self::AlreadyExists { name },
            StoreError::RunNotFound { run_id } => Self::RunNotFound { run_id },
            other => Self::Store(other),
        }
    }
}

/// Why a single download task failed. Never aborts the pool.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Remote(#[from] ClientError),

    #[error("controller returned no artifact URL")]
    MissingArtifactUrl,

    #[error("artifact is not a readable archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("artifact contains none of the expected result files")]
    NoResultEntries,

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_engine_not_found() {
        let err: EngineError = StoreError::NotFound { name: "s".into() }.into();
        assert!(matches!(err, EngineError::NotFound { ref name } if name == "s"));
    }

    #[test]
    fn store_duplicate_maps_to_already_exists() {
        let err: EngineError = StoreError::AlreadyExists { name: "s".into() }.into();
        assert_eq!(err.to_string(), "Session 's' already exists");
    }
}
