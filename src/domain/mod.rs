//! Domain layer containing survey engagement logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, state machine, errors)
//! - `transit` - Stops and coordinates surveys are shown against
//! - `survey` - Survey content, answers and prioritization
//! - `classification` - Mapping of network failures to user-facing categories
//! - `external_survey` - Links to externally hosted surveys
//! - `flow` - Flow status, actions and observable view state

pub mod classification;
pub mod external_survey;
pub mod flow;
pub mod foundation;
pub mod survey;
pub mod transit;
