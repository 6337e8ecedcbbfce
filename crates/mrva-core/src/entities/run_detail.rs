//! The controller's live view of a run.
//!
//! Decoded once at the client boundary; optional fields stay optional instead
//! of being probed at the call site.

use serde::{Deserialize, Serialize};

use crate::enums::{AnalysisStatus, RunStatus, SkipCategory};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunDetail {
    #[serde(default)]
    pub id: u64,
    pub status: RunStatus,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub scanned_repositories: Vec<ScannedRepository>,
    #[serde(default)]
    pub skipped_repositories: SkippedRepositories,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScannedRepository {
    pub repository: RepositoryRef,
    pub analysis_status: AnalysisStatus,
    /// Absent until the analysis has finished.
    #[serde(default)]
    pub result_count: Option<u64>,
    #[serde(default)]
    pub artifact_size_in_bytes: Option<u64>,
}

impl ScannedRepository {
    /// Number of results, treating a missing count as zero.
    #[must_use]
    pub fn findings(&self) -> u64 {
        self.result_count.unwrap_or(0)
    }

    #[must_use]
    pub fn has_findings(&self) -> bool {
        self.findings() > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryRef {
    pub full_name: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub private: bool,
}

/// Repositories the controller declined to analyze, bucketed by reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedRepositories {
    #[serde(default)]
    pub access_mismatch_repos: SkippedGroup,
    #[serde(default)]
    pub not_found_repos: SkippedGroup,
    #[serde(default)]
    pub no_codeql_db_repos: SkippedGroup,
    #[serde(default)]
    pub over_limit_repos: SkippedGroup,
}

impl SkippedRepositories {
    #[must_use]
    pub const fn group(&self, category: SkipCategory) -> &SkippedGroup {
        match category {
            SkipCategory::AccessMismatch => &self.access_mismatch_repos,
            SkipCategory::NotFound => &self.not_found_repos,
            SkipCategory::NoDatabase => &self.no_codeql_db_repos,
            SkipCategory::OverLimit => &self.over_limit_repos,
        }
    }

    /// Sum of the four bucket counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        SkipCategory::ALL
            .iter()
            .map(|category| self.group(*category).repository_count)
            .sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedGroup {
    #[serde(default)]
    pub repository_count: u64,
}

/// Per-repository detail holding the location of the result archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactLocation {
    #[serde(default)]
    pub artifact_url: Option<String>,
}
