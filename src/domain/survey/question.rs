//! Survey questions and their typed content.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::answer::Answer;
use crate::domain::foundation::QuestionId;

/// Discriminant of [`QuestionContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Label,
    Text,
    Radio,
    Checkbox,
    ExternalSurvey,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionType::Label => "label",
            QuestionType::Text => "text",
            QuestionType::Radio => "radio",
            QuestionType::Checkbox => "checkbox",
            QuestionType::ExternalSurvey => "external_survey",
        };
        write!(f, "{}", s)
    }
}

/// What a question displays and what kind of answer it takes.
///
/// Label content is informational only: it is never answerable and never
/// counts toward completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionContent {
    Label {
        label_text: String,
    },
    Text {
        label_text: String,
    },
    Radio {
        label_text: String,
        #[serde(default)]
        options: Vec<String>,
    },
    Checkbox {
        label_text: String,
        #[serde(default)]
        options: Vec<String>,
    },
    ExternalSurvey {
        label_text: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        survey_provider: Option<String>,
        #[serde(default)]
        embedded_data_fields: Vec<String>,
    },
}

impl QuestionContent {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionContent::Label { .. } => QuestionType::Label,
            QuestionContent::Text { .. } => QuestionType::Text,
            QuestionContent::Radio { .. } => QuestionType::Radio,
            QuestionContent::Checkbox { .. } => QuestionType::Checkbox,
            QuestionContent::ExternalSurvey { .. } => QuestionType::ExternalSurvey,
        }
    }

    pub fn label_text(&self) -> &str {
        match self {
            QuestionContent::Label { label_text }
            | QuestionContent::Text { label_text }
            | QuestionContent::Radio { label_text, .. }
            | QuestionContent::Checkbox { label_text, .. }
            | QuestionContent::ExternalSurvey { label_text, .. } => label_text,
        }
    }

    pub fn is_label(&self) -> bool {
        matches!(self, QuestionContent::Label { .. })
    }

    /// Base URL of an external survey link, if this content carries one.
    pub fn external_url(&self) -> Option<&str> {
        match self {
            QuestionContent::ExternalSurvey { url, .. } => url.as_deref(),
            _ => None,
        }
    }

    /// Contextual fields the external survey link asks for.
    pub fn embedded_data_fields(&self) -> &[String] {
        match self {
            QuestionContent::ExternalSurvey {
                embedded_data_fields,
                ..
            } => embedded_data_fields,
            _ => &[],
        }
    }

    /// Returns true when `answer` is the right shape for this content.
    ///
    /// Choice answers must name one of the offered options.
    pub fn accepts(&self, answer: &Answer) -> bool {
        match (self, answer) {
            (QuestionContent::Text { .. }, Answer::Text(_)) => true,
            (QuestionContent::Radio { options, .. }, Answer::Choice(choice)) => {
                options.contains(choice)
            }
            (QuestionContent::Checkbox { options, .. }, Answer::MultipleChoice(choices)) => {
                choices.iter().all(|c| options.contains(c))
            }
            _ => false,
        }
    }
}

/// A single question of a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub id: QuestionId,
    /// Display and answer order within the survey.
    pub position: i32,
    #[serde(default)]
    pub required: bool,
    pub content: QuestionContent,
}

impl SurveyQuestion {
    pub fn is_label(&self) -> bool {
        self.content.is_label()
    }

    pub fn question_type(&self) -> QuestionType {
        self.content.question_type()
    }
}
