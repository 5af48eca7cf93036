//! Survey module - read-only survey content decoded from the backend.
//!
//! - `Study` - research study a survey belongs to
//! - `Survey` - the survey itself, with its ordered questions
//! - `SurveyQuestion` / `QuestionContent` - typed question content
//! - `Answer` / `QuestionAnswerSubmission` - rider answers
//! - `prioritizer` - selection of the survey to present

mod answer;
mod prioritizer;
mod question;
mod study;
#[allow(clippy::module_inception)]
mod survey;

#[cfg(test)]
pub(crate) mod fixtures;

pub use answer::{Answer, QuestionAnswerSubmission};
pub use prioritizer::{SurveyPrioritizer, SurveyResponseHistory};
pub use question::{QuestionContent, QuestionType, SurveyQuestion};
pub use study::Study;
pub use survey::Survey;
