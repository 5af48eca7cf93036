//! Survey flow configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Longest pacing delay accepted; anything longer reads as a hang.
const MAX_PACING_DELAY_MS: u64 = 5000;

/// Survey flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Pause between a successful hero answer and the remaining-questions form
    #[serde(default = "default_pacing_delay_ms")]
    pub pacing_delay_ms: u64,
}

impl FlowConfig {
    /// Get the pacing delay as Duration
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Config with a custom pacing delay.
    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Validate flow configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pacing_delay_ms > MAX_PACING_DELAY_MS {
            return Err(ValidationError::PacingDelayTooLong);
        }
        Ok(())
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            pacing_delay_ms: default_pacing_delay_ms(),
        }
    }
}

fn default_pacing_delay_ms() -> u64 {
    1500
}
