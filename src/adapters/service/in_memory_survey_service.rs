//! Scripted Survey Service for tests and demos.
//!
//! Serves a fixed survey list and accepts every submission unless a failure
//! has been queued for the next call of that kind.
//!
//! # Features
//!
//! - Fixed survey list
//! - Failure injection per operation (consumed in order)
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let service = InMemorySurveyService::new()
//!     .with_surveys(vec![survey])
//!     .with_delay(Duration::from_millis(50));
//!
//! service.fail_next_submit(ClassifiedError::RequestFailure { status_code: 500 }.into());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::classification::SurveyServiceError;
use crate::domain::survey::{QuestionAnswerSubmission, Survey};
use crate::ports::{SurveyResponseScope, SurveyService};

/// One recorded call to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Fetch,
    Submit {
        scope: SurveyResponseScope,
        answer: QuestionAnswerSubmission,
    },
    Update {
        scope: SurveyResponseScope,
        answers: Vec<QuestionAnswerSubmission>,
    },
}

#[derive(Debug, Default)]
struct Script {
    surveys: Vec<Survey>,
    fetch_failures: VecDeque<SurveyServiceError>,
    submit_failures: VecDeque<SurveyServiceError>,
    update_failures: VecDeque<SurveyServiceError>,
    calls: Vec<RecordedCall>,
}

/// In-memory survey backend.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyService {
    script: Arc<Mutex<Script>>,
    delay: Duration,
}

impl InMemorySurveyService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the survey list every fetch returns.
    pub fn with_surveys(self, surveys: Vec<Survey>) -> Self {
        self.set_surveys(surveys);
        self
    }

    /// Simulated latency applied to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set_surveys(&self, surveys: Vec<Survey>) {
        self.script().surveys = surveys;
    }

    pub fn fail_next_fetch(&self, error: SurveyServiceError) {
        self.script().fetch_failures.push_back(error);
    }

    pub fn fail_next_submit(&self, error: SurveyServiceError) {
        self.script().submit_failures.push_back(error);
    }

    pub fn fail_next_update(&self, error: SurveyServiceError) {
        self.script().update_failures.push_back(error);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.script().calls.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.count(|call| matches!(call, RecordedCall::Fetch))
    }

    pub fn submit_count(&self) -> usize {
        self.count(|call| matches!(call, RecordedCall::Submit { .. }))
    }

    pub fn update_count(&self) -> usize {
        self.count(|call| matches!(call, RecordedCall::Update { .. }))
    }

    fn count(&self, predicate: impl Fn(&RecordedCall) -> bool) -> usize {
        self.script().calls.iter().filter(|call| predicate(call)).count()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl SurveyService for InMemorySurveyService {
    async fn fetch_surveys(&self) -> Result<Vec<Survey>, SurveyServiceError> {
        let outcome = {
            let mut script = self.script();
            script.calls.push(RecordedCall::Fetch);
            match script.fetch_failures.pop_front() {
                Some(err) => Err(err),
                None => Ok(script.surveys.clone()),
            }
        };
        self.simulate_latency().await;
        outcome
    }

    async fn submit_survey_response(
        &self,
        scope: &SurveyResponseScope,
        answer: &QuestionAnswerSubmission,
    ) -> Result<(), SurveyServiceError> {
        let outcome = {
            let mut script = self.script();
            script.calls.push(RecordedCall::Submit {
                scope: scope.clone(),
                answer: answer.clone(),
            });
            script.submit_failures.pop_front().map_or(Ok(()), Err)
        };
        self.simulate_latency().await;
        outcome
    }

    async fn update_survey_responses(
        &self,
        scope: &SurveyResponseScope,
        answers: &[QuestionAnswerSubmission],
    ) -> Result<(), SurveyServiceError> {
        let outcome = {
            let mut script = self.script();
            script.calls.push(RecordedCall::Update {
                scope: scope.clone(),
                answers: answers.to_vec(),
            });
            script.update_failures.pop_front().map_or(Ok(()), Err)
        };
        self.simulate_latency().await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::ClassifiedError;
    use crate::domain::foundation::{QuestionId, SurveyId};
    use crate::domain::survey::fixtures::{survey_with, text_question};
    use crate::domain::survey::Answer;

    #[tokio::test]
    async fn fetch_returns_configured_surveys() {
        let service = InMemorySurveyService::new().with_surveys(vec![survey_with(
            1,
            vec![text_question(10, 1)],
        )]);

        let surveys = service.fetch_surveys().await.unwrap();
        assert_eq!(surveys.len(), 1);
        assert_eq!(service.fetch_count(), 1);
    }

    #[tokio::test]
    async fn queued_failure_is_used_once() {
        let service = InMemorySurveyService::new();
        service.fail_next_fetch(ClassifiedError::RequestFailure { status_code: 502 }.into());

        assert!(service.fetch_surveys().await.is_err());
        assert!(service.fetch_surveys().await.is_ok());
        assert_eq!(service.fetch_count(), 2);
    }

    #[tokio::test]
    async fn submissions_are_recorded_in_order() {
        let service = InMemorySurveyService::new();
        let scope = SurveyResponseScope::new(SurveyId::new(1), None);
        let answer = QuestionAnswerSubmission::new(QuestionId::new(10), Answer::Text("ok".into()));

        service.submit_survey_response(&scope, &answer).await.unwrap();
        service
            .update_survey_responses(&scope, std::slice::from_ref(&answer))
            .await
            .unwrap();

        assert_eq!(
            service.calls(),
            vec![
                RecordedCall::Submit {
                    scope: scope.clone(),
                    answer: answer.clone(),
                },
                RecordedCall::Update {
                    scope,
                    answers: vec![answer],
                },
            ]
        );
    }

    #[tokio::test]
    async fn clones_share_the_script() {
        let service = InMemorySurveyService::new();
        let clone = service.clone();
        clone.fail_next_update(ClassifiedError::NoResponseBody.into());

        let scope = SurveyResponseScope::new(SurveyId::new(1), None);
        assert!(service.update_survey_responses(&scope, &[]).await.is_err());
        assert_eq!(clone.update_count(), 1);
    }
}
