//! # mrva-client
//!
//! Client for the remote variant analysis controller.
//!
//! The engine depends only on the [`AnalysisClient`] contract:
//! - submit a run for a chunk of repositories
//! - fetch the live status of a run
//! - fetch the per-repository detail holding the artifact location
//! - fetch an artifact blob by URL
//! - fetch a pre-built analysis database
//!
//! [`GitHubClient`] implements it against the GitHub REST API. Any failure is
//! reported as a [`ClientError`]; nothing here retries.

mod error;
mod github;
mod http;

pub use error::ClientError;
pub use github::{GitHubClient, GitHubOptions};

use async_trait::async_trait;
use mrva_core::{ArtifactLocation, RunDetail};

/// Contract the engine relies on for every remote interaction.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Submit one run; returns the controller-assigned run id.
    async fn submit_run(
        &self,
        controller: &str,
        language: &str,
        repositories: &[String],
        bundle: &str,
    ) -> Result<u64, ClientError>;

    /// Live status of a run.
    async fn run_status(&self, controller: &str, run_id: u64) -> Result<RunDetail, ClientError>;

    /// Per-repository detail of a run.
    async fn run_repository_detail(
        &self,
        controller: &str,
        run_id: u64,
        nwo: &str,
    ) -> Result<ArtifactLocation, ClientError>;

    /// Download an artifact blob.
    async fn fetch_blob(&self, url: &str) -> Result<Vec<u8>, ClientError>;

    /// Download the analysis database of `nwo` for `language`.
    async fn fetch_database(&self, nwo: &str, language: &str) -> Result<Vec<u8>, ClientError>;
}
