//! HTTP Survey Service - `SurveyService` over the survey backend's REST API.
//!
//! Endpoints, relative to the configured base URL:
//!
//! - `GET surveys.json?user_id=..` returns `{"surveys": [...]}`
//! - `POST survey_responses.json` creates a response from the hero answer and
//!   returns `{"id": ".."}`
//! - `PATCH survey_responses/{id}.json` adds the remaining answers
//!
//! Failures are reported in the raw families the classifier understands:
//! transport failures become connectivity errors, bad statuses and bodies
//! become unclassified API errors, and JSON errors become decoding errors.
//!
//! # Configuration
//!
//! ```ignore
//! let service = HttpSurveyService::new(&config.api, state_manager.user_id())?;
//! ```

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::config::{ApiConfig, ValidationError};
use crate::domain::classification::{
    ClassifiedError, ConnectivityCode, ConnectivityError, DecodingError, SurveyServiceError,
};
use crate::domain::foundation::{QuestionId, SurveyId};
use crate::domain::survey::{QuestionAnswerSubmission, Survey};
use crate::ports::{SurveyResponseScope, SurveyService};

/// Errors building the HTTP service.
#[derive(Debug, thiserror::Error)]
pub enum HttpSurveyServiceError {
    #[error("Invalid API configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Survey backend client.
pub struct HttpSurveyService {
    client: Client,
    base_url: Url,
    user_id: String,
    // Response ids created by hero submissions, used by later updates
    response_ids: Mutex<HashMap<SurveyId, String>>,
}

impl HttpSurveyService {
    /// Creates a client for the configured backend on behalf of `user_id`.
    pub fn new(config: &ApiConfig, user_id: impl Into<String>) -> Result<Self, HttpSurveyServiceError> {
        let base_url = config.base_url()?;
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url,
            user_id: user_id.into(),
            response_ids: Mutex::new(HashMap::new()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SurveyServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| SurveyServiceError::other(e))
    }

    fn remember_response_id(&self, survey_id: SurveyId, response_id: String) {
        if let Ok(mut ids) = self.response_ids.lock() {
            ids.insert(survey_id, response_id);
        }
    }

    fn response_id(&self, survey_id: SurveyId) -> Option<String> {
        self.response_ids
            .lock()
            .ok()
            .and_then(|ids| ids.get(&survey_id).cloned())
    }
}

#[async_trait]
impl SurveyService for HttpSurveyService {
    async fn fetch_surveys(&self) -> Result<Vec<Survey>, SurveyServiceError> {
        let mut url = self.endpoint("surveys.json")?;
        url.query_pairs_mut().append_pair("user_id", &self.user_id);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body: SurveysResponse = read_json(response).await?;
        debug!(count = body.surveys.len(), "fetched surveys");
        Ok(body.surveys)
    }

    async fn submit_survey_response(
        &self,
        scope: &SurveyResponseScope,
        answer: &QuestionAnswerSubmission,
    ) -> Result<(), SurveyServiceError> {
        let url = self.endpoint("survey_responses.json")?;
        let request = CreateResponseRequest::new(&self.user_id, scope, std::slice::from_ref(answer));

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let created: CreatedResponse = read_json(response).await?;
        debug!(survey_id = %scope.survey_id, response_id = %created.id, "created survey response");
        self.remember_response_id(scope.survey_id, created.id);
        Ok(())
    }

    async fn update_survey_responses(
        &self,
        scope: &SurveyResponseScope,
        answers: &[QuestionAnswerSubmission],
    ) -> Result<(), SurveyServiceError> {
        let Some(response_id) = self.response_id(scope.survey_id) else {
            warn!(survey_id = %scope.survey_id, "no survey response to update");
            return Err(ClassifiedError::RequestNotFound.into());
        };

        let url = self.endpoint(&format!("survey_responses/{}.json", response_id))?;
        let request = UpdateResponseRequest {
            responses: answers.iter().map(WireAnswer::from).collect(),
        };

        let response = self
            .client
            .patch(url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_error)?;

        check_status(response.status())
    }
}

// === Wire format ===

#[derive(Debug, Deserialize)]
struct SurveysResponse {
    #[serde(default)]
    surveys: Vec<Survey>,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct WireAnswer {
    question_id: QuestionId,
    answer: String,
}

impl From<&QuestionAnswerSubmission> for WireAnswer {
    fn from(submission: &QuestionAnswerSubmission) -> Self {
        Self {
            question_id: submission.question_id,
            answer: submission.answer.to_wire_value(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateResponseRequest<'a> {
    user_identifier: &'a str,
    survey_id: SurveyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_identifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_longitude: Option<f64>,
    responses: Vec<WireAnswer>,
}

impl<'a> CreateResponseRequest<'a> {
    fn new(
        user_identifier: &'a str,
        scope: &'a SurveyResponseScope,
        answers: &[QuestionAnswerSubmission],
    ) -> Self {
        Self {
            user_identifier,
            survey_id: scope.survey_id,
            stop_identifier: scope.stop_id.as_ref().map(|id| id.as_str()),
            stop_latitude: scope.stop_latitude,
            stop_longitude: scope.stop_longitude,
            responses: answers.iter().map(WireAnswer::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct UpdateResponseRequest {
    responses: Vec<WireAnswer>,
}

// === Error mapping ===

/// Maps a reqwest transport failure onto a connectivity code.
fn map_transport_error(err: reqwest::Error) -> SurveyServiceError {
    if err.is_decode() {
        return DecodingError::new(err.to_string()).into();
    }

    let code = if err.is_timeout() {
        ConnectivityCode::TimedOut
    } else if err.is_connect() {
        ConnectivityCode::CannotConnectToHost
    } else if err.is_body() || err.is_request() {
        ConnectivityCode::NetworkConnectionLost
    } else {
        ConnectivityCode::Unknown
    };
    ConnectivityError::new(code, err.to_string()).into()
}

fn check_status(status: StatusCode) -> Result<(), SurveyServiceError> {
    if status.is_success() {
        return Ok(());
    }
    let classified = match status {
        StatusCode::NOT_FOUND => ClassifiedError::RequestNotFound,
        other => ClassifiedError::RequestFailure {
            status_code: other.as_u16(),
        },
    };
    Err(classified.into())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SurveyServiceError> {
    check_status(response.status())?;

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body = response.bytes().await.map_err(map_transport_error)?;

    decode_body(content_type.as_deref(), &body)
}

fn decode_body<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T, SurveyServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ClassifiedError::NoResponseBody.into());
    }
    if !content_type.is_some_and(is_json_content_type) {
        return Err(ClassifiedError::InvalidContentType.into());
    }
    serde_json::from_slice(body).map_err(|e| DecodingError::from(e).into())
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}
