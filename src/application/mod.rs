//! Application layer - orchestration over domain logic and ports.
//!
//! - `SurveyStateManager` - policy facade over persisted survey state
//! - `SurveyFlowController` - the survey question-answer state machine

mod flow_controller;
mod survey_state_manager;

pub use flow_controller::{SurveyFlowController, SurveyFlowPorts};
pub use survey_state_manager::SurveyStateManager;
