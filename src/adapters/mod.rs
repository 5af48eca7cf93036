//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the engine to external systems:
//! - `service` - survey backend (HTTP, scripted)
//! - `storage` - survey state (YAML file, in-memory)
//! - `context` - region, location and cellular state set by the host
//! - `recent_stops` - recently viewed stops

pub mod context;
pub mod recent_stops;
pub mod service;
pub mod storage;

pub use context::{StaticApplicationContext, StaticCellularDataMonitor};
pub use recent_stops::InMemoryRecentStopStore;
pub use service::{HttpSurveyService, HttpSurveyServiceError, InMemorySurveyService, RecordedCall};
pub use storage::{open_survey_state_store, FileSurveyStateStore, InMemorySurveyStateStore};
