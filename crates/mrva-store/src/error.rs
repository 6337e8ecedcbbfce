//! Session store error types.

use std::path::PathBuf;

use mrva_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No session with this name.
    #[error("Session '{name}' does not exist")]
    NotFound { name: String },

    /// No stored session contains this run.
    #[error("No session contains run {run_id}")]
    RunNotFound { run_id: u64 },

    /// A session with this name is already stored.
    #[error("Session '{name}' already exists")]
    AlreadyExists { name: String },

    /// Reading or writing the store file failed.
    #[error("Session store I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file is not a valid session document.
    #[error("Session store at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The session failed validation before being written.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}
