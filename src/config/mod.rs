//! Engine configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SURVEY_ENGINE` prefix
//! and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use survey_engagement::config::AppConfig;
//!
//! let config = AppConfig::load().expect("survey engine configuration");
//! config.validate().expect("valid survey engine configuration");
//!
//! println!("Pacing delay: {:?}", config.flow.pacing_delay());
//! ```

mod api;
mod error;
mod flow;
mod logging;
mod state;

pub use api::ApiConfig;
pub use error::{ConfigError, ValidationError};
pub use flow::FlowConfig;
pub use logging::LoggingConfig;
pub use state::SurveyStateConfig;

use serde::Deserialize;

/// Root engine configuration
///
/// Every section has defaults, so an empty environment yields a usable
/// in-memory configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Flow pacing
    #[serde(default)]
    pub flow: FlowConfig,

    /// Reminder interval and state file location
    #[serde(default)]
    pub state: SurveyStateConfig,

    /// Survey backend
    #[serde(default)]
    pub api: ApiConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Reads the configuration from `SURVEY_ENGINE__*` environment variables.
    ///
    /// A `.env` file in the working directory is honoured when present.
    /// Sections and keys are separated by double underscores:
    ///
    /// - `SURVEY_ENGINE__FLOW__PACING_DELAY_MS=800` -> `flow.pacing_delay_ms = 800`
    /// - `SURVEY_ENGINE__API__BASE_URL=...` -> `api.base_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SURVEY_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Checks every section; the first invalid value wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.flow.validate()?;
        self.state.validate()?;
        self.api.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
