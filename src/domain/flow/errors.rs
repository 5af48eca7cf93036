//! Local flow failures: validation and link building.
//!
//! These never reach the network and never go through the classifier; each
//! maps to one fixed message.

use thiserror::Error;

use crate::domain::foundation::QuestionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Please answer the question before continuing.")]
    HeroAnswerMissing,

    #[error("That answer doesn't fit this question. Please choose again.")]
    HeroAnswerInvalid,

    #[error("Please answer all questions before submitting.")]
    IncompleteAnswers { missing: Vec<QuestionId> },

    #[error("We couldn't open this survey. Please try again later.")]
    ExternalSurveyUnavailable,
}

/// Shown once the remaining answers are saved.
pub const SUBMISSION_SUCCESS_MESSAGE: &str = "Thank you for your feedback!";
