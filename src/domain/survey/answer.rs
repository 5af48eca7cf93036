//! Answers recorded for survey questions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::QuestionId;

/// A rider's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Free-form text.
    Text(String),
    /// One option of a single-choice question.
    Choice(String),
    /// Any number of options of a multiple-choice question.
    MultipleChoice(Vec<String>),
}

impl Answer {
    /// Returns true when the answer carries nothing worth submitting.
    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Text(text) | Answer::Choice(text) => text.trim().is_empty(),
            Answer::MultipleChoice(choices) => choices.iter().all(|c| c.trim().is_empty()),
        }
    }

    /// Flattens the answer into the single string the backend stores.
    pub fn to_wire_value(&self) -> String {
        match self {
            Answer::Text(text) | Answer::Choice(text) => text.clone(),
            Answer::MultipleChoice(choices) => choices.join(","),
        }
    }
}

/// An answer keyed by the question it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerSubmission {
    pub question_id: QuestionId,
    pub answer: Answer,
}

impl QuestionAnswerSubmission {
    pub fn new(question_id: QuestionId, answer: Answer) -> Self {
        Self {
            question_id,
            answer,
        }
    }
}
