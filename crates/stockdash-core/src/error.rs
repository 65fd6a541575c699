//! Error types for stockdash-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Please enter a stock symbol")]
    EmptySymbol,

    #[error("No daily time series in payload")]
    MissingTimeSeries,

    #[error("Invalid field {field} on {date}: {reason}")]
    InvalidField {
        date: String,
        field: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
