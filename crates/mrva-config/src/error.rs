//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be parsed or did not match the config shape.
    #[error("failed to load mrva configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// The platform has no config directory and no sessions file was set.
    #[error("cannot locate the session store; set general.sessions_file or MRVA_GENERAL__SESSIONS_FILE")]
    NoConfigDir,

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Figment(Box::new(error))
    }
}
