//! Strongly-typed identifier value objects.
//!
//! Backend-assigned numeric identifiers (surveys, questions, studies, regions)
//! wrap an `i64`; transit identifiers (stops, routes) and the rider's stable
//! user identifier wrap a `String`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Declares a numeric identifier newtype with the shared trait set.
macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a backend-assigned identifier.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw numeric value.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a survey.
    SurveyId
);

numeric_id!(
    /// Stable key of a survey question, used for answer lookup.
    QuestionId
);

numeric_id!(
    /// Identifier of the research study a survey belongs to.
    StudyId
);

numeric_id!(
    /// Identifier of a transit-service region.
    RegionId
);

/// Identifier of a transit stop (e.g. `1_75403`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a transit route (e.g. `1_40`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable, anonymous identifier of the rider answering surveys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_id_displays_raw_value() {
        assert_eq!(SurveyId::new(42).to_string(), "42");
    }

    #[test]
    fn numeric_ids_serialize_transparently() {
        let json = serde_json::to_string(&QuestionId::new(7)).unwrap();
        assert_eq!(json, "7");

        let id: RegionId = serde_json::from_str("1").unwrap();
        assert_eq!(id, RegionId::new(1));
    }

    #[test]
    fn numeric_ids_order_by_value() {
        assert!(SurveyId::new(1) < SurveyId::new(2));
    }

    #[test]
    fn stop_id_round_trips_as_plain_string() {
        let id: StopId = serde_json::from_str("\"1_75403\"").unwrap();
        assert_eq!(id.as_str(), "1_75403");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("abc").is_ok());
    }

    #[test]
    fn generated_user_ids_are_unique() {
        assert_ne!(UserId::generate(), UserId::generate());
    }
}
