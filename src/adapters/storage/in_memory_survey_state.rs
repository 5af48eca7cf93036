//! In-Memory Survey State Adapter
//!
//! Keeps completion, skip and reminder state in memory.
//! Useful for testing and development.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::foundation::{SurveyId, Timestamp, UserId};
use crate::ports::{SurveyStateError, SurveyStateStore};

#[derive(Debug, Default)]
struct SurveyStateData {
    completed: HashSet<SurveyId>,
    skipped: HashSet<SurveyId>,
    next_reminder_date: Option<Timestamp>,
    user_id: Option<UserId>,
}

/// In-memory storage for survey state
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyStateStore {
    data: Arc<RwLock<SurveyStateData>>,
}

impl InMemorySurveyStateStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already knows the rider
    pub fn with_user_id(user_id: UserId) -> Self {
        let store = Self::new();
        if let Ok(mut data) = store.data.write() {
            data.user_id = Some(user_id);
        }
        store
    }

    /// Clear all stored data (useful for tests)
    pub fn clear(&self) {
        if let Ok(mut data) = self.data.write() {
            *data = SurveyStateData::default();
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, SurveyStateData>, SurveyStateError> {
        self.data
            .read()
            .map_err(|_| SurveyStateError::IoError("survey state lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, SurveyStateData>, SurveyStateError> {
        self.data
            .write()
            .map_err(|_| SurveyStateError::IoError("survey state lock poisoned".into()))
    }
}

impl SurveyStateStore for InMemorySurveyStateStore {
    fn is_survey_completed(&self, survey_id: SurveyId) -> Result<bool, SurveyStateError> {
        Ok(self.read()?.completed.contains(&survey_id))
    }

    fn is_survey_skipped(&self, survey_id: SurveyId) -> Result<bool, SurveyStateError> {
        Ok(self.read()?.skipped.contains(&survey_id))
    }

    fn set_survey_completed(&self, survey_id: SurveyId) -> Result<(), SurveyStateError> {
        self.write()?.completed.insert(survey_id);
        Ok(())
    }

    fn set_survey_skipped(&self, survey_id: SurveyId) -> Result<(), SurveyStateError> {
        self.write()?.skipped.insert(survey_id);
        Ok(())
    }

    fn next_reminder_date(&self) -> Result<Option<Timestamp>, SurveyStateError> {
        Ok(self.read()?.next_reminder_date)
    }

    fn set_next_reminder_date(&self, date: Timestamp) -> Result<(), SurveyStateError> {
        self.write()?.next_reminder_date = Some(date);
        Ok(())
    }

    fn user_id(&self) -> Result<UserId, SurveyStateError> {
        let mut data = self.write()?;
        Ok(data.user_id.get_or_insert_with(UserId::generate).clone())
    }
}
