//! SurveyStateManager - facade over persisted survey state.
//!
//! Wraps the `SurveyStateStore` port with the engine's policy: reminder
//! scheduling, and logging instead of propagating store failures. A broken
//! store never breaks the flow; it only makes the engine more reluctant to
//! show surveys.

use chrono::Duration;
use std::sync::Arc;
use tracing::warn;

use crate::config::SurveyStateConfig;
use crate::domain::foundation::{SurveyId, Timestamp};
use crate::domain::survey::SurveyResponseHistory;
use crate::ports::SurveyStateStore;

#[derive(Clone)]
pub struct SurveyStateManager {
    store: Arc<dyn SurveyStateStore>,
    reminder_interval: Duration,
}

impl SurveyStateManager {
    pub fn new(store: Arc<dyn SurveyStateStore>, config: &SurveyStateConfig) -> Self {
        Self {
            store,
            reminder_interval: config.reminder_interval(),
        }
    }

    /// Returns false while a reminder is pending, or when state can't be read.
    pub fn should_show_survey(&self) -> bool {
        self.should_show_survey_at(&Timestamp::now())
    }

    pub fn should_show_survey_at(&self, now: &Timestamp) -> bool {
        match self.store.next_reminder_date() {
            Ok(Some(reminder)) => !now.is_before(&reminder),
            Ok(None) => true,
            Err(err) => {
                warn!(error = %err, "failed to read survey reminder date");
                false
            }
        }
    }

    pub fn set_survey_completed(&self, survey_id: SurveyId) {
        if let Err(err) = self.store.set_survey_completed(survey_id) {
            warn!(%survey_id, error = %err, "failed to mark survey completed");
        }
    }

    pub fn set_survey_skipped(&self, survey_id: SurveyId) {
        if let Err(err) = self.store.set_survey_skipped(survey_id) {
            warn!(%survey_id, error = %err, "failed to mark survey skipped");
        }
    }

    /// Postpones all surveys by the configured reminder interval.
    pub fn set_next_reminder_date(&self) {
        self.set_next_reminder_date_from(&Timestamp::now());
    }

    pub fn set_next_reminder_date_from(&self, now: &Timestamp) {
        let reminder = now.plus(self.reminder_interval);
        if let Err(err) = self.store.set_next_reminder_date(reminder) {
            warn!(error = %err, "failed to store survey reminder date");
        }
    }

    /// Stable rider id for links and submissions; empty when unavailable.
    pub fn user_id(&self) -> String {
        match self.store.user_id() {
            Ok(id) => id.to_string(),
            Err(err) => {
                warn!(error = %err, "failed to read survey user id");
                String::new()
            }
        }
    }
}

impl SurveyResponseHistory for SurveyStateManager {
    fn is_survey_completed(&self, survey_id: SurveyId) -> bool {
        self.store.is_survey_completed(survey_id).unwrap_or_else(|err| {
            warn!(%survey_id, error = %err, "failed to read survey completion");
            false
        })
    }

    fn is_survey_skipped(&self, survey_id: SurveyId) -> bool {
        self.store.is_survey_skipped(survey_id).unwrap_or_else(|err| {
            warn!(%survey_id, error = %err, "failed to read survey skip state");
            false
        })
    }
}
