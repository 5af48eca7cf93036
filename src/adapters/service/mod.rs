//! Survey Service Adapters
//!
//! - **HttpSurveyService** - reqwest client for the survey backend
//! - **InMemorySurveyService** - scripted backend (testing/demos)

mod http_survey_service;
mod in_memory_survey_service;

pub use http_survey_service::{HttpSurveyService, HttpSurveyServiceError};
pub use in_memory_survey_service::{InMemorySurveyService, RecordedCall};
