//! Gateway error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Message returned for any failure while talking to the upstream provider.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch stock data";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or empty `symbol` query parameter.
    #[error("Symbol is required")]
    BadRequest,

    /// No upstream API key configured.
    #[error("Server misconfigured: missing API key")]
    ServerMisconfigured,

    /// Upstream answered with a non-2xx status; status and body are proxied.
    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// Upstream payload carried an explicit error message.
    #[error("{0}")]
    UpstreamMessage(String),

    /// Upstream payload carried a rate-limit advisory.
    #[error("{0}")]
    RateLimited(String),

    /// Transport, timeout, or decode failure. The detail is logged, not returned.
    #[error("Failed to fetch stock data: {0}")]
    FetchFailed(String),
}

impl GatewayError {
    /// HTTP status returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamStatus { status, .. } => *status,
            Self::UpstreamMessage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::FetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::ServerMisconfigured => "misconfigured",
            Self::UpstreamStatus { .. } => "upstream_status",
            Self::UpstreamMessage(_) => "upstream_error",
            Self::RateLimited(_) => "rate_limited",
            Self::FetchFailed(_) => "fetch_failed",
        }
    }

    /// Text placed in the `error` field of the response body.
    pub fn client_message(&self) -> String {
        match self {
            Self::UpstreamStatus { body, .. } => body.clone(),
            Self::FetchFailed(_) => FETCH_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "error": self.client_message() })),
        )
            .into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GatewayError::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GatewayError::ServerMisconfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            GatewayError::RateLimited("slow down".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            GatewayError::UpstreamStatus {
                status: StatusCode::BAD_GATEWAY,
                body: "oops".into()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_client_message_hides_fetch_detail() {
        let err = GatewayError::FetchFailed("connection refused (os error 111)".into());
        assert_eq!(err.client_message(), FETCH_FAILED_MESSAGE);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_upstream_status_wraps_body() {
        let err = GatewayError::UpstreamStatus {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "maintenance".into(),
        };
        assert_eq!(err.client_message(), "maintenance");
    }
}
