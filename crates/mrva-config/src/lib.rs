//! # mrva-config
//!
//! Layered configuration loading for mrva using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MRVA_*` prefix, `__` as separator)
//! 2. Project-level `.mrva/config.toml`
//! 3. User-level `~/.config/mrva/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags sit above all of these; the binary applies them when it
//! resolves the per-invocation settings.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MRVA_GENERAL__CONTROLLER` -> `general.controller`,
//! `MRVA_GITHUB__TOKEN` -> `github.token`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use mrva_config::MrvaConfig;
//!
//! let config = MrvaConfig::load().expect("config");
//! println!("workers: {}", config.general.workers);
//! ```

mod error;
mod general;
mod github;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use github::GitHubConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "mrva";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MrvaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub github: GitHubConfig,
}

impl MrvaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// `.env` files are not read here; the binary loads them beforehand so
    /// they feed the `MRVA_*` layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".mrva/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("MRVA_").split("__"))
    }

    /// Directory holding the user-global config and the session store.
    #[must_use]
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Location of the session store: the configured override, else
    /// `<config_dir>/mrva/sessions.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no override is set and the
    /// platform has no config directory.
    pub fn sessions_file(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.general.sessions_file {
            return Ok(path.clone());
        }
        Self::config_dir()
            .map(|dir| dir.join("sessions.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.general.workers == 0 {
            return Err(ConfigError::Invalid {
                key: "general.workers",
                reason: "must be at least 1",
            });
        }
        if self.github.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "github.timeout_secs",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
