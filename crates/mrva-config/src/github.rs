//! GitHub API connection settings.

use serde::{Deserialize, Serialize};

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

fn default_action_repo_ref() -> String {
    "main".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Personal access token. Falls back to `GH_TOKEN` / `GITHUB_TOKEN`.
    #[serde(default)]
    pub token: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Reference branch of the analysis workflow repository.
    #[serde(default = "default_action_repo_ref")]
    pub action_repo_ref: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
            action_repo_ref: default_action_repo_ref(),
        }
    }
}

impl GitHubConfig {
    /// The configured token, or the first non-empty of `GH_TOKEN` and
    /// `GITHUB_TOKEN`.
    #[must_use]
    pub fn resolved_token(&self) -> Option<String> {
        if !self.token.is_empty() {
            return Some(self.token.clone());
        }
        ["GH_TOKEN", "GITHUB_TOKEN"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GitHubConfig::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.token.is_empty());
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.action_repo_ref, "main");
    }

    #[test]
    fn explicit_token_wins() {
        let config = GitHubConfig {
            token: "ghp_explicit".into(),
            ..GitHubConfig::default()
        };
        assert_eq!(config.resolved_token().as_deref(), Some("ghp_explicit"));
    }
}
