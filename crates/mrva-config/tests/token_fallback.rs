use figment::Jail;
use mrva_config::GitHubConfig;

#[test]
fn falls_back_to_gh_token() {
    Jail::expect_with(|jail| {
        jail.set_env("GH_TOKEN", "ghp_gh");
        jail.set_env("GITHUB_TOKEN", "ghp_github");

        let config = GitHubConfig::default();
        assert_eq!(config.resolved_token().as_deref(), Some("ghp_gh"));
        Ok(())
    });
}

#[test]
fn falls_back_to_github_token_when_gh_token_empty() {
    Jail::expect_with(|jail| {
        jail.set_env("GH_TOKEN", "");
        jail.set_env("GITHUB_TOKEN", "ghp_github");

        let config = GitHubConfig::default();
        assert_eq!(config.resolved_token().as_deref(), Some("ghp_github"));
        Ok(())
    });
}
