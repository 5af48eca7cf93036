//! SurveyService port - Interface to the survey backend.
//!
//! The engine fetches the survey list, submits the hero answer, and then
//! updates the same response with the remaining answers. None of the calls
//! return a payload beyond success or failure; survey content comes from the
//! fetched list.
//!
//! Failures are reported as raw [`SurveyServiceError`] values. The flow
//! controller passes them through the classifier before showing anything.

use async_trait::async_trait;

use crate::domain::classification::SurveyServiceError;
use crate::domain::foundation::{StopId, SurveyId};
use crate::domain::survey::{QuestionAnswerSubmission, Survey};
use crate::domain::transit::Stop;

/// Which survey a response belongs to and where the rider answered it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyResponseScope {
    pub survey_id: SurveyId,
    pub stop_id: Option<StopId>,
    pub stop_longitude: Option<f64>,
    pub stop_latitude: Option<f64>,
}

impl SurveyResponseScope {
    /// Scope for a response given on the map, or at `stop` when present.
    pub fn new(survey_id: SurveyId, stop: Option<&Stop>) -> Self {
        Self {
            survey_id,
            stop_id: stop.map(|s| s.id.clone()),
            stop_longitude: stop.map(|s| s.coordinate.longitude),
            stop_latitude: stop.map(|s| s.coordinate.latitude),
        }
    }
}

/// Port for the survey backend.
#[async_trait]
pub trait SurveyService: Send + Sync {
    /// Fetch the surveys available to the rider in the current region.
    async fn fetch_surveys(&self) -> Result<Vec<Survey>, SurveyServiceError>;

    /// Submit the first (hero) answer, creating the survey response.
    async fn submit_survey_response(
        &self,
        scope: &SurveyResponseScope,
        answer: &QuestionAnswerSubmission,
    ) -> Result<(), SurveyServiceError>;

    /// Add the remaining answers to the survey response, as one batch.
    async fn update_survey_responses(
        &self,
        scope: &SurveyResponseScope,
        answers: &[QuestionAnswerSubmission],
    ) -> Result<(), SurveyServiceError>;
}
