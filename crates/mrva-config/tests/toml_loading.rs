//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use std::path::PathBuf;

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use mrva_config::MrvaConfig;
use mrva_core::FailedRunPolicy;

fn jailed_figment() -> Figment {
    Figment::from(Serialized::defaults(MrvaConfig::default()))
        .merge(Toml::file("config.toml"))
        .merge(Env::prefixed("MRVA_").split("__"))
}

#[test]
fn loads_general_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
controller = "octo/mrva-controller"
list_file = "/lists/repos.json"
codeql_path = "/opt/codeql"
workers = 4
failed_run_policy = "mark_failed"
"#,
        )?;

        let config: MrvaConfig = jailed_figment().extract()?;

        assert_eq!(
            config.general.controller.as_deref(),
            Some("octo/mrva-controller")
        );
        assert_eq!(
            config.general.list_file,
            Some(PathBuf::from("/lists/repos.json"))
        );
        assert_eq!(config.general.codeql_path, Some(PathBuf::from("/opt/codeql")));
        assert_eq!(config.general.workers, 4);
        assert_eq!(config.general.failed_run_policy, FailedRunPolicy::MarkFailed);
        Ok(())
    });
}

#[test]
fn loads_github_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[github]
api_url = "https://ghe.example.com/api/v3"
token = "ghp_toml"
timeout_secs = 15
"#,
        )?;

        let config: MrvaConfig = jailed_figment().extract()?;

        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.github.token, "ghp_toml");
        assert_eq!(config.github.timeout_secs, 15);
        assert_eq!(config.github.action_repo_ref, "main");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
controller = "octo/ctl"
"#,
        )?;

        let config: MrvaConfig = jailed_figment().extract()?;

        assert_eq!(config.general.workers, 10);
        assert!(config.general.list_file.is_none());
        assert_eq!(config.github.api_url, "https://api.github.com");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
controller = "octo/from-toml"
workers = 2
"#,
        )?;
        jail.set_env("MRVA_GENERAL__CONTROLLER", "octo/from-env");
        jail.set_env("MRVA_GITHUB__TOKEN", "ghp_env");

        let config: MrvaConfig = jailed_figment().extract()?;

        assert_eq!(config.general.controller.as_deref(), Some("octo/from-env"));
        assert_eq!(config.general.workers, 2);
        assert_eq!(config.github.token, "ghp_env");
        Ok(())
    });
}

#[test]
fn invalid_policy_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
failed_run_policy = "sometimes"
"#,
        )?;

        let result: Result<MrvaConfig, _> = jailed_figment().extract();
        assert!(result.is_err());
        Ok(())
    });
}
