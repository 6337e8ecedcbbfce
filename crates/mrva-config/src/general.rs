//! General application configuration.

use std::path::PathBuf;

use mrva_core::FailedRunPolicy;
use serde::{Deserialize, Serialize};

/// Default size of the download worker pool.
const fn default_workers() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Controller repository (`owner/repo`) that hosts variant analyses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// JSON file mapping list names to repository arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_file: Option<PathBuf>,

    /// Toolchain distribution / additional packs directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codeql_path: Option<PathBuf>,

    /// Number of concurrent download workers.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Override for the session store location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sessions_file: Option<PathBuf>,

    /// How failed runs roll up into the session status.
    #[serde(default)]
    pub failed_run_policy: FailedRunPolicy,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            controller: None,
            list_file: None,
            codeql_path: None,
            workers: default_workers(),
            sessions_file: None,
            failed_run_policy: FailedRunPolicy::default(),
        }
    }
}
