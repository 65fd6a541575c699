//! Dashboard error types.
//!
//! `Display` output of `DashboardError` is the user-visible message.

use stockdash_core::Symbol;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Empty symbol; no request was made.
    #[error("Please enter a stock symbol")]
    Validation,

    /// Gateway answered without usable data.
    #[error("No data found for {symbol}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    NoData {
        symbol: Symbol,
        detail: Option<String>,
    },

    /// Transport or decode failure.
    #[error("Error fetching data: {0}")]
    Fetch(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Key-value store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DashboardResult<T> = Result<T, DashboardError>;
pub type StoreResult<T> = Result<T, StoreError>;
