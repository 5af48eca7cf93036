//! Configuration errors

use thiserror::Error;

/// Failure to read the engine configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read survey engine configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Survey engine configuration is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// A configuration value that parsed but makes no sense
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required setting: {0}")]
    MissingRequired(&'static str),

    #[error("Pacing delay must be at most 5000 ms")]
    PacingDelayTooLong,

    #[error("Reminder interval must be at least one hour")]
    InvalidReminderInterval,

    #[error("API timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Survey API base URL must be an http(s) URL")]
    InvalidBaseUrl,

    #[error("Log level is not a valid filter directive")]
    InvalidLogLevel,
}
