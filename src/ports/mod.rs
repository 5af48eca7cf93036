//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! - `SurveyService` - survey backend (fetch, submit, update)
//! - `SurveyStateStore` - persisted completion, skip and reminder state
//! - `ApplicationContext` - current region and location
//! - `CellularDataMonitor` - device cellular-data restriction
//! - `RecentStopStore` - recently viewed stops

mod app_context;
mod recent_stop_store;
mod survey_service;
mod survey_state_store;

pub use app_context::{ApplicationContext, CellularDataMonitor};
pub use recent_stop_store::RecentStopStore;
pub use survey_service::{SurveyResponseScope, SurveyService};
pub use survey_state_store::{SurveyStateError, SurveyStateStore};
