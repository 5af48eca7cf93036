//! Error classification - turns transport and decoding failures into
//! categories riders can act on.

mod classifier;
mod errors;

pub use classifier::{
    classify, classify_with, ClassificationRule, ClassificationSink, TracingClassificationSink,
    SERVER_ERROR_STATUS, SERVER_UNAVAILABLE_STATUSES,
};
pub use errors::{
    ClassifiedError, ConnectivityCode, ConnectivityError, DecodingError, SurveyServiceError,
    SERVER_PROBLEM_MESSAGE,
};
