//! SurveyStateStore port - Persistence of what the rider did with surveys.
//!
//! Holds completed and skipped survey ids, the next reminder date and the
//! rider's stable user id. The store outlives any single flow and is shared
//! across them; writes are last-writer-wins keyed by survey id.
//!
//! Calls are synchronous: skip and remind-later must take effect before the
//! flow leaves the screen.

use crate::domain::foundation::{SurveyId, Timestamp, UserId};

/// Errors that can occur during survey state persistence.
#[derive(Debug, thiserror::Error)]
pub enum SurveyStateError {
    #[error("Failed to serialize survey state: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize survey state: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisted survey completion, skip and reminder state.
pub trait SurveyStateStore: Send + Sync {
    fn is_survey_completed(&self, survey_id: SurveyId) -> Result<bool, SurveyStateError>;

    fn is_survey_skipped(&self, survey_id: SurveyId) -> Result<bool, SurveyStateError>;

    fn set_survey_completed(&self, survey_id: SurveyId) -> Result<(), SurveyStateError>;

    fn set_survey_skipped(&self, survey_id: SurveyId) -> Result<(), SurveyStateError>;

    /// When the rider asked to be reminded, if they did.
    fn next_reminder_date(&self) -> Result<Option<Timestamp>, SurveyStateError>;

    fn set_next_reminder_date(&self, date: Timestamp) -> Result<(), SurveyStateError>;

    /// Returns the rider's stable id, creating and persisting one on first use.
    fn user_id(&self) -> Result<UserId, SurveyStateError>;
}
