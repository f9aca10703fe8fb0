use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("The provider answered with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("The provider returned an error for '{symbol}': {code} - {description}")]
    Provider {
        symbol: String,
        code: String,
        description: String,
    },

    #[error("No data available for '{0}'")]
    DataUnavailable(String),

    #[error("Response for '{symbol}' is missing the '{field}' field")]
    MissingField { symbol: String, field: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(#[from] CoreError),
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::RequestBuild(e) => e.is_timeout() || e.is_connect(),
            ApiError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
