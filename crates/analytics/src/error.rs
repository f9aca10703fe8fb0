use core_types::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Why a metric could not be produced.
///
/// Every variant is local to one asset and one metric group; none of them is
/// fatal to a comparison.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum AnalyticsError {
    #[error("No price data available: {0}")]
    DataUnavailable(String),

    #[error("Malformed price data: {0}")]
    MalformedInput(String),

    #[error("Not enough data to compute {metric}: need {required} points, got {actual}")]
    NotEnoughData {
        metric: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Degenerate input for {metric}: {reason}")]
    Degenerate { metric: &'static str, reason: String },

    #[error("Calculation error in metric '{0}'")]
    Calculation(String),
}

/// Coarse classification of an `AnalyticsError`, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    DataUnavailable,
    MalformedInput,
    Degenerate,
    Computation,
}

impl AnalyticsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AnalyticsError::DataUnavailable(_) => FailureKind::DataUnavailable,
            AnalyticsError::MalformedInput(_) => FailureKind::MalformedInput,
            AnalyticsError::NotEnoughData { .. } | AnalyticsError::Degenerate { .. } => {
                FailureKind::Degenerate
            }
            AnalyticsError::Calculation(_) => FailureKind::Computation,
        }
    }
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptySeries(_) => AnalyticsError::DataUnavailable(err.to_string()),
            _ => AnalyticsError::MalformedInput(err.to_string()),
        }
    }
}
