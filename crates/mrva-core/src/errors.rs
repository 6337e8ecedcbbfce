//! Errors raised by the domain types themselves.
//!
//! Each crate owns the errors of its own boundary (`StoreError`,
//! `ClientError`, `PackError`, `EngineError`); the binary folds them into
//! `anyhow`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A session or run carries a value the controller would reject.
    #[error("invalid session: {0}")]
    Validation(String),
}
