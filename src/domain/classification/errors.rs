//! Raw and classified error types for survey network operations.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Generic text shown when the server sent something the client cannot read.
///
/// Parser messages are never shown to riders.
pub const SERVER_PROBLEM_MESSAGE: &str =
    "There was a problem with the server. Please try again later.";

/// User-facing error categories. Display text is safe to render as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    #[error("You appear to be on a Wi-Fi network that requires signing in. Sign in and try again.")]
    CaptivePortal,

    #[error("The requested survey could not be found.")]
    RequestNotFound,

    #[error("The server returned an empty response.")]
    NoResponseBody,

    #[error("The server returned a response in an unexpected format.")]
    InvalidContentType,

    /// Generic HTTP failure that has not been classified further.
    #[error("The request failed with status code {status_code}.")]
    RequestFailure { status_code: u16 },

    /// HTTP 500 with a known region.
    #[error("The {region_name} server is having a problem right now. Please try again later.")]
    ServerError { region_name: String },

    /// HTTP 502/503/504, an unreadable payload, or an unreachable host.
    #[error("The {region_name} server is temporarily unavailable. Please try again later.")]
    ServerUnavailable {
        region_name: String,
        status_code: Option<u16>,
    },

    #[error("Unable to connect. Check your internet connection and try again.")]
    NetworkFailure(Option<ConnectivityError>),

    #[error("Cellular data is turned off for this app. Turn it on in Settings or connect to Wi-Fi.")]
    CellularDataRestricted,

    #[error("{0}")]
    Unstructured(String),
}

impl ClassifiedError {
    /// Returns true for the categories `classify` never rewrites.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ClassifiedError::ServerError { .. }
                | ClassifiedError::ServerUnavailable { .. }
                | ClassifiedError::CellularDataRestricted
        )
    }
}

/// Symbolic connectivity-layer failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityCode {
    NotConnectedToInternet,
    NetworkConnectionLost,
    DataNotAllowed,
    TimedOut,
    CannotConnectToHost,
    CannotFindHost,
    SecureConnectionFailed,
    Cancelled,
    Unknown,
}

impl ConnectivityCode {
    /// The device has no usable data path at all.
    pub fn is_no_connectivity(&self) -> bool {
        matches!(
            self,
            ConnectivityCode::NotConnectedToInternet
                | ConnectivityCode::NetworkConnectionLost
                | ConnectivityCode::DataNotAllowed
        )
    }

    /// The device is online but the server could not be reached.
    pub fn is_host_unreachable(&self) -> bool {
        matches!(
            self,
            ConnectivityCode::TimedOut
                | ConnectivityCode::CannotConnectToHost
                | ConnectivityCode::CannotFindHost
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code:?})")]
pub struct ConnectivityError {
    pub code: ConnectivityCode,
    pub message: String,
}

impl ConnectivityError {
    pub fn new(code: ConnectivityCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A response payload that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("response couldn't be read: {message}")]
pub struct DecodingError {
    pub message: String,
}

impl DecodingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DecodingError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Any failure a survey service call can produce.
#[derive(Clone, Error)]
pub enum SurveyServiceError {
    #[error(transparent)]
    Classified(#[from] ClassifiedError),

    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),

    #[error(transparent)]
    Decoding(#[from] DecodingError),

    #[error("{0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl SurveyServiceError {
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SurveyServiceError::Other(Arc::new(err))
    }

    pub fn as_classified(&self) -> Option<&ClassifiedError> {
        match self {
            SurveyServiceError::Classified(classified) => Some(classified),
            _ => None,
        }
    }

    /// Text suitable for a toast.
    ///
    /// Unclassified families fall back to generic wording so raw transport
    /// and parser text never reaches riders.
    pub fn user_message(&self) -> String {
        match self {
            SurveyServiceError::Classified(classified) => classified.to_string(),
            SurveyServiceError::Connectivity(_) => ClassifiedError::NetworkFailure(None).to_string(),
            SurveyServiceError::Decoding(_) => SERVER_PROBLEM_MESSAGE.to_string(),
            SurveyServiceError::Other(err) => err.to_string(),
        }
    }
}

impl fmt::Debug for SurveyServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyServiceError::Classified(e) => f.debug_tuple("Classified").field(e).finish(),
            SurveyServiceError::Connectivity(e) => f.debug_tuple("Connectivity").field(e).finish(),
            SurveyServiceError::Decoding(e) => f.debug_tuple("Decoding").field(e).finish(),
            SurveyServiceError::Other(e) => f.debug_tuple("Other").field(&e.to_string()).finish(),
        }
    }
}

impl PartialEq for SurveyServiceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SurveyServiceError::Classified(a), SurveyServiceError::Classified(b)) => a == b,
            (SurveyServiceError::Connectivity(a), SurveyServiceError::Connectivity(b)) => a == b,
            (SurveyServiceError::Decoding(a), SurveyServiceError::Decoding(b)) => a == b,
            (SurveyServiceError::Other(a), SurveyServiceError::Other(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}
