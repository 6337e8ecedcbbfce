use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mrva_client::{GitHubClient, GitHubOptions};
use mrva_config::MrvaConfig;
use mrva_store::SessionStore;

/// Per-invocation resources, built once in `main` and passed to handlers.
pub struct AppContext {
    pub config: MrvaConfig,
    pub store: SessionStore,
}

impl AppContext {
    pub fn init(config: MrvaConfig) -> anyhow::Result<Self> {
        let path = config.sessions_file()?;
        let store = SessionStore::open(&path)
            .with_context(|| format!("failed to open session store at {}", path.display()))?;
        Ok(Self { config, store })
    }

    /// Authenticated controller client. Only commands that talk to the
    /// controller need a token.
    pub fn client(&self) -> anyhow::Result<Arc<GitHubClient>> {
        let github = &self.config.github;
        let client = GitHubClient::new(GitHubOptions {
            api_url: github.api_url.clone(),
            token: github.resolved_token(),
            timeout: Duration::from_secs(github.timeout_secs),
            action_repo_ref: github.action_repo_ref.clone(),
        })
        .context("failed to create GitHub client")?;
        Ok(Arc::new(client))
    }
}

/// Explicit flag, else configured value, else an error naming both.
pub fn resolve_setting<T: Clone>(
    flag: Option<&T>,
    configured: Option<&T>,
    flag_name: &str,
    config_key: &str,
) -> anyhow::Result<T> {
    flag.or(configured)
        .cloned()
        .with_context(|| format!("missing {flag_name} (or set {config_key} in config)"))
}
