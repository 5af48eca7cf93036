//! Survey state persistence configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Survey state configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyStateConfig {
    /// How long "remind me later" hides surveys
    #[serde(default = "default_reminder_interval_hours")]
    pub reminder_interval_hours: u32,

    /// YAML file backing the state store; in-memory when absent
    pub file_path: Option<PathBuf>,
}

impl SurveyStateConfig {
    /// Get the reminder interval as a chrono Duration
    pub fn reminder_interval(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.reminder_interval_hours))
    }

    /// Validate state configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reminder_interval_hours == 0 {
            return Err(ValidationError::InvalidReminderInterval);
        }
        Ok(())
    }
}

impl Default for SurveyStateConfig {
    fn default() -> Self {
        Self {
            reminder_interval_hours: default_reminder_interval_hours(),
            file_path: None,
        }
    }
}

fn default_reminder_interval_hours() -> u32 {
    24
}
