//! # mrva-pack
//!
//! Everything that happens on the local machine before a run is submitted:
//! resolving the named repository list, expanding query suites and
//! compiling each query into the base64 pack the controller expects.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mrva_core::QueryBundle;

mod bundle;
mod codeql;
mod error;
mod lists;
pub mod qlpack;

pub use bundle::CodeqlPackBuilder;
pub use codeql::Toolchain;
pub use error::PackError;
pub use lists::JsonListResolver;

/// Turns a list name into the ordered `owner/repo` identifiers it names.
pub trait RepositoryListResolver {
    /// # Errors
    ///
    /// Returns [`PackError`] if the list file is unreadable or the list is
    /// absent.
    fn resolve(&self, list_file: &Path, list_name: &str) -> Result<Vec<String>, PackError>;
}

/// Produces the encoded query pack for one query and language.
#[async_trait]
pub trait BundleBuilder: Send + Sync {
    /// # Errors
    ///
    /// Returns [`PackError`] if the query is missing or packaging fails.
    async fn build(&self, query: &Path, language: &str) -> Result<QueryBundle, PackError>;
}

/// The queries to submit: the single `query`, or every query of `suite`.
///
/// # Errors
///
/// Returns [`PackError::EmptySuite`] when the suite expands to nothing.
pub async fn resolve_queries(
    toolchain: &Toolchain,
    query: Option<&Path>,
    suite: Option<&Path>,
) -> Result<Vec<PathBuf>, PackError> {
    match (query, suite) {
        (Some(query), _) => Ok(vec![query.to_path_buf()]),
        (None, Some(suite)) => toolchain.resolve_queries(suite).await,
        (None, None) => Ok(Vec::new()),
    }
}
