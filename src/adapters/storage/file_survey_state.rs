//! File-based Survey State Adapter
//!
//! Stores survey state as a single YAML document on disk. Every write
//! rewrites the whole file; a missing file reads as empty state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::foundation::{SurveyId, Timestamp, UserId};
use crate::ports::{SurveyStateError, SurveyStateStore};

/// On-disk layout of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSurveyState {
    #[serde(default)]
    completed_survey_ids: BTreeSet<SurveyId>,
    #[serde(default)]
    skipped_survey_ids: BTreeSet<SurveyId>,
    #[serde(default)]
    next_reminder_date: Option<Timestamp>,
    #[serde(default)]
    user_id: Option<UserId>,
}

/// File-based storage for survey state
#[derive(Debug)]
pub struct FileSurveyStateStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileSurveyStateStore {
    /// Create a store backed by the YAML file at `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSurveyStateStore::new("./data/survey_state.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PersistedSurveyState, SurveyStateError> {
        if !self.path.exists() {
            return Ok(PersistedSurveyState::default());
        }

        let yaml =
            fs::read_to_string(&self.path).map_err(|e| SurveyStateError::IoError(e.to_string()))?;
        if yaml.trim().is_empty() {
            return Ok(PersistedSurveyState::default());
        }

        serde_yaml::from_str(&yaml)
            .map_err(|e| SurveyStateError::DeserializationFailed(e.to_string()))
    }

    fn save(&self, state: &PersistedSurveyState) -> Result<(), SurveyStateError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SurveyStateError::IoError(e.to_string()))?;
        }

        let yaml = serde_yaml::to_string(state)
            .map_err(|e| SurveyStateError::SerializationFailed(e.to_string()))?;

        fs::write(&self.path, yaml).map_err(|e| SurveyStateError::IoError(e.to_string()))
    }

    fn update<T>(
        &self,
        f: impl FnOnce(&mut PersistedSurveyState) -> T,
    ) -> Result<T, SurveyStateError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SurveyStateError::IoError("survey state lock poisoned".into()))?;

        let mut state = self.load()?;
        let result = f(&mut state);
        self.save(&state)?;
        Ok(result)
    }
}

impl SurveyStateStore for FileSurveyStateStore {
    fn is_survey_completed(&self, survey_id: SurveyId) -> Result<bool, SurveyStateError> {
        Ok(self.load()?.completed_survey_ids.contains(&survey_id))
    }

    fn is_survey_skipped(&self, survey_id: SurveyId) -> Result<bool, SurveyStateError> {
        Ok(self.load()?.skipped_survey_ids.contains(&survey_id))
    }

    fn set_survey_completed(&self, survey_id: SurveyId) -> Result<(), SurveyStateError> {
        self.update(|state| {
            state.completed_survey_ids.insert(survey_id);
        })
    }

    fn set_survey_skipped(&self, survey_id: SurveyId) -> Result<(), SurveyStateError> {
        self.update(|state| {
            state.skipped_survey_ids.insert(survey_id);
        })
    }

    fn next_reminder_date(&self) -> Result<Option<Timestamp>, SurveyStateError> {
        Ok(self.load()?.next_reminder_date)
    }

    fn set_next_reminder_date(&self, date: Timestamp) -> Result<(), SurveyStateError> {
        self.update(|state| {
            state.next_reminder_date = Some(date);
        })
    }

    fn user_id(&self) -> Result<UserId, SurveyStateError> {
        if let Some(id) = self.load()?.user_id {
            return Ok(id);
        }
        self.update(|state| state.user_id.get_or_insert_with(UserId::generate).clone())
    }
}
