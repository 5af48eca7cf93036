//! Maps raw survey-service failures to user-facing categories.
//!
//! Rules, in priority order:
//!
//! 1. `ServerError`, `ServerUnavailable` and `CellularDataRestricted` are final
//!    and returned unchanged.
//! 2. Classified API failures: 500 becomes `ServerError`, 502/503/504 become
//!    `ServerUnavailable` (both only with a region name); `NetworkFailure`
//!    becomes `CellularDataRestricted` when cellular data is off; everything
//!    else is unchanged.
//! 3. Connectivity errors: no-connectivity codes map to
//!    `CellularDataRestricted` or `NetworkFailure`; host-unreachable codes map
//!    to `ServerUnavailable` when a region is known; the rest are
//!    `NetworkFailure`.
//! 4. Decoding errors: `ServerUnavailable` with a region, otherwise a generic
//!    `Unstructured` server message.
//! 5. Anything else is returned unmodified.
//!
//! 501 and other 5xx statuses stay `RequestFailure`.

use tracing::debug;

use super::errors::{
    ClassifiedError, ConnectivityError, DecodingError, SurveyServiceError, SERVER_PROBLEM_MESSAGE,
};

/// Status treated as a transient server error.
pub const SERVER_ERROR_STATUS: u16 = 500;

/// Statuses treated as "server unavailable".
pub const SERVER_UNAVAILABLE_STATUSES: [u16; 3] = [502, 503, 504];

/// Which rule produced a classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    AlreadyFinal,
    ServerError,
    ServerUnavailableStatus,
    CellularDataRestricted,
    NoConnectivity,
    HostUnreachable,
    OtherConnectivity,
    DecodingWithRegion,
    DecodingWithoutRegion,
    PassThrough,
}

/// Diagnostic side channel for classification decisions.
pub trait ClassificationSink: Send + Sync {
    fn record(&self, rule: ClassificationRule, input: &SurveyServiceError, output: &SurveyServiceError);
}

/// Emits each decision as a `tracing` debug event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingClassificationSink;

impl ClassificationSink for TracingClassificationSink {
    fn record(&self, rule: ClassificationRule, input: &SurveyServiceError, output: &SurveyServiceError) {
        debug!(?rule, input = %input, output = %output, "classified survey service error");
    }
}

/// Classifies `error`, logging through `tracing`.
pub fn classify(
    error: SurveyServiceError,
    region_name: Option<&str>,
    is_cellular_data_restricted: bool,
) -> SurveyServiceError {
    classify_with(
        error,
        region_name,
        is_cellular_data_restricted,
        &TracingClassificationSink,
    )
}

/// Classifies `error`, reporting the decision to `sink`.
pub fn classify_with(
    error: SurveyServiceError,
    region_name: Option<&str>,
    is_cellular_data_restricted: bool,
    sink: &dyn ClassificationSink,
) -> SurveyServiceError {
    let (rule, output) = apply_rules(&error, region_name, is_cellular_data_restricted);
    let output = output.unwrap_or_else(|| error.clone());
    sink.record(rule, &error, &output);
    output
}

/// Returns the rule that fired and, when it rewrites, the new value.
fn apply_rules(
    error: &SurveyServiceError,
    region_name: Option<&str>,
    restricted: bool,
) -> (ClassificationRule, Option<SurveyServiceError>) {
    match error {
        SurveyServiceError::Classified(classified) => {
            classify_api_failure(classified, region_name, restricted)
        }
        SurveyServiceError::Connectivity(connectivity) => {
            let (rule, classified) = classify_connectivity(connectivity, region_name, restricted);
            (rule, Some(classified.into()))
        }
        SurveyServiceError::Decoding(decoding) => {
            let (rule, classified) = classify_decoding(decoding, region_name);
            (rule, Some(classified.into()))
        }
        SurveyServiceError::Other(_) => (ClassificationRule::PassThrough, None),
    }
}

fn classify_api_failure(
    classified: &ClassifiedError,
    region_name: Option<&str>,
    restricted: bool,
) -> (ClassificationRule, Option<SurveyServiceError>) {
    if classified.is_final() {
        return (ClassificationRule::AlreadyFinal, None);
    }

    match (classified, region_name) {
        (ClassifiedError::RequestFailure { status_code }, Some(region))
            if *status_code == SERVER_ERROR_STATUS =>
        {
            let out = ClassifiedError::ServerError {
                region_name: region.to_string(),
            };
            (ClassificationRule::ServerError, Some(out.into()))
        }
        (ClassifiedError::RequestFailure { status_code }, Some(region))
            if SERVER_UNAVAILABLE_STATUSES.contains(status_code) =>
        {
            let out = ClassifiedError::ServerUnavailable {
                region_name: region.to_string(),
                status_code: Some(*status_code),
            };
            (ClassificationRule::ServerUnavailableStatus, Some(out.into()))
        }
        (ClassifiedError::NetworkFailure(_), _) if restricted => (
            ClassificationRule::CellularDataRestricted,
            Some(ClassifiedError::CellularDataRestricted.into()),
        ),
        _ => (ClassificationRule::PassThrough, None),
    }
}

fn classify_connectivity(
    error: &ConnectivityError,
    region_name: Option<&str>,
    restricted: bool,
) -> (ClassificationRule, ClassifiedError) {
    if error.code.is_no_connectivity() {
        if restricted {
            return (
                ClassificationRule::CellularDataRestricted,
                ClassifiedError::CellularDataRestricted,
            );
        }
        return (
            ClassificationRule::NoConnectivity,
            ClassifiedError::NetworkFailure(Some(error.clone())),
        );
    }

    if error.code.is_host_unreachable() {
        if let Some(region) = region_name {
            return (
                ClassificationRule::HostUnreachable,
                ClassifiedError::ServerUnavailable {
                    region_name: region.to_string(),
                    status_code: None,
                },
            );
        }
        return (
            ClassificationRule::HostUnreachable,
            ClassifiedError::NetworkFailure(Some(error.clone())),
        );
    }

    (
        ClassificationRule::OtherConnectivity,
        ClassifiedError::NetworkFailure(Some(error.clone())),
    )
}

fn classify_decoding(
    _error: &DecodingError,
    region_name: Option<&str>,
) -> (ClassificationRule, ClassifiedError) {
    match region_name {
        Some(region) => (
            ClassificationRule::DecodingWithRegion,
            ClassifiedError::ServerUnavailable {
                region_name: region.to_string(),
                status_code: None,
            },
        ),
        None => (
            ClassificationRule::DecodingWithoutRegion,
            ClassifiedError::Unstructured(SERVER_PROBLEM_MESSAGE.to_string()),
        ),
    }
}
