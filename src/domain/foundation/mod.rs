//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and validation
//! errors that form the vocabulary of the survey engagement domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{QuestionId, RegionId, RouteId, StopId, StudyId, SurveyId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
