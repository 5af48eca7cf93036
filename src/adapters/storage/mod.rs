//! Storage Adapters
//!
//! Implementations of the SurveyStateStore port.
//!
//! ## Available Adapters
//!
//! - **FileSurveyStateStore** - Stores state as a YAML file on disk
//! - **InMemorySurveyStateStore** - Stores state in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::open_survey_state_store;
//!
//! // YAML file when `state.file_path` is set, in memory otherwise
//! let store = open_survey_state_store(&config.state);
//! ```

mod file_survey_state;
mod in_memory_survey_state;

pub use file_survey_state::FileSurveyStateStore;
pub use in_memory_survey_state::InMemorySurveyStateStore;

use std::sync::Arc;

use crate::config::SurveyStateConfig;
use crate::ports::SurveyStateStore;

/// Picks the state store named by the configuration.
pub fn open_survey_state_store(config: &SurveyStateConfig) -> Arc<dyn SurveyStateStore> {
    match &config.file_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using file survey state store");
            Arc::new(FileSurveyStateStore::new(path))
        }
        None => {
            tracing::debug!("Using in-memory survey state store");
            Arc::new(InMemorySurveyStateStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SurveyId;
    use tempfile::TempDir;

    #[test]
    fn configured_file_path_persists_state_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("survey_state.yaml");
        let config = SurveyStateConfig {
            file_path: Some(path.clone()),
            ..Default::default()
        };

        let store = open_survey_state_store(&config);
        store.set_survey_completed(SurveyId::new(7)).unwrap();

        assert!(path.exists());
        let reopened = open_survey_state_store(&config);
        assert!(reopened.is_survey_completed(SurveyId::new(7)).unwrap());
    }

    #[test]
    fn missing_file_path_keeps_state_in_memory() {
        let dir = TempDir::new().unwrap();
        let config = SurveyStateConfig::default();

        let store = open_survey_state_store(&config);
        store.set_survey_skipped(SurveyId::new(3)).unwrap();

        assert!(store.is_survey_skipped(SurveyId::new(3)).unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        let fresh = open_survey_state_store(&config);
        assert!(!fresh.is_survey_skipped(SurveyId::new(3)).unwrap());
    }
}
