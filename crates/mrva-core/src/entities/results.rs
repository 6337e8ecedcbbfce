use serde::{Deserialize, Serialize};

use crate::enums::{RunStatus, SessionStatus, SkipCategory};

/// Live status of one run within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunStatusEntry {
    pub id: u64,
    pub query: String,
    pub query_id: String,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// A repository whose analysis produced at least one result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoWithFindings {
    pub nwo: String,
    pub query: String,
    pub query_id: String,
    pub count: u64,
    pub run_id: u64,
    pub stars: u64,
}

/// Per-session rollup, computed fresh on every status query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Results {
    pub name: String,
    pub status: SessionStatus,
    pub runs: Vec<RunStatusEntry>,
    pub repositories_with_findings: Vec<RepoWithFindings>,
    pub total_findings_count: u64,
    pub total_successful_scans: u64,
    pub total_failed_scans: u64,
    pub total_repositories_with_findings: u64,
    pub total_skipped_repositories: u64,
    pub total_skipped_access_mismatch_repositories: u64,
    pub total_skipped_not_found_repositories: u64,
    pub total_skipped_no_database_repositories: u64,
    pub total_skipped_over_limit_repositories: u64,
}

impl Results {
    /// An empty rollup for `name`; status starts as `succeeded` and is
    /// downgraded as runs are folded in.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: SessionStatus::Succeeded,
            runs: Vec::new(),
            repositories_with_findings: Vec::new(),
            total_findings_count: 0,
            total_successful_scans: 0,
            total_failed_scans: 0,
            total_repositories_with_findings: 0,
            total_skipped_repositories: 0,
            total_skipped_access_mismatch_repositories: 0,
            total_skipped_not_found_repositories: 0,
            total_skipped_no_database_repositories: 0,
            total_skipped_over_limit_repositories: 0,
        }
    }

    /// Counter for one skip bucket.
    #[must_use]
    pub const fn skipped(&self, category: SkipCategory) -> u64 {
        match category {
            SkipCategory::AccessMismatch => self.total_skipped_access_mismatch_repositories,
            SkipCategory::NotFound => self.total_skipped_not_found_repositories,
            SkipCategory::NoDatabase => self.total_skipped_no_database_repositories,
            SkipCategory::OverLimit => self.total_skipped_over_limit_repositories,
        }
    }

    /// Add `count` to one skip bucket and to the overall skipped total.
    pub fn add_skipped(&mut self, category: SkipCategory, count: u64) {
        let bucket = match category {
            SkipCategory::AccessMismatch => &mut self.total_skipped_access_mismatch_repositories,
            SkipCategory::NotFound => &mut self.total_skipped_not_found_repositories,
            SkipCategory::NoDatabase => &mut self.total_skipped_no_database_repositories,
            SkipCategory::OverLimit => &mut self.total_skipped_over_limit_repositories,
        };
        *bucket += count;
        self.total_skipped_repositories += count;
    }
}
