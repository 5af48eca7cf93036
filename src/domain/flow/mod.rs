//! Flow module - vocabulary of the survey question-answer flow.
//!
//! - `FlowStatus` - state machine of one survey presentation
//! - `FlowAction` - rider actions dispatched by the presentation layer
//! - `FlowViewState` - observable state rendered by the presentation layer
//! - `Toast` - transient notifications
//! - `FlowError` - local validation and link-building failures

mod action;
mod errors;
mod status;
mod toast;
mod view_state;

pub use action::FlowAction;
pub use errors::{FlowError, SUBMISSION_SUCCESS_MESSAGE};
pub use status::FlowStatus;
pub use toast::{Toast, ToastSeverity};
pub use view_state::FlowViewState;
