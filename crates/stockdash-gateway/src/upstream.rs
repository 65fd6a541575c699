//! Upstream provider client and response classification.
//!
//! One call to [`UpstreamClient::fetch_daily`] issues exactly one
//! `TIME_SERIES_DAILY` GET. [`classify`] then turns the raw reply into either
//! the unmodified JSON payload or a [`GatewayError`], checking in order:
//! non-2xx status, explicit error field, rate-limit advisory.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use reqwest::Client;
use serde_json::Value;
use stockdash_core::Symbol;
use stockdash_telemetry::Metrics;
use tracing::debug;

use crate::error::{GatewayError, GatewayResult};

/// Payload field carrying an explicit provider error.
pub const ERROR_MESSAGE_FIELD: &str = "Error Message";

/// Payload fields carrying a rate-limit or usage advisory.
pub const ADVISORY_FIELDS: [&str; 2] = ["Note", "Information"];

/// Raw upstream reply before classification.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client for the market-data provider.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    query_url: String,
}

impl UpstreamClient {
    /// Create a client for the provider at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::FetchFailed(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            query_url: format!("{}/query", base_url.trim_end_matches('/')),
        })
    }

    /// Fetch the daily time series for `symbol`.
    ///
    /// Any transport failure, including failure to read the body, maps to
    /// `GatewayError::FetchFailed`. Status codes are not interpreted here.
    pub async fn fetch_daily(&self, symbol: &Symbol, api_key: &str) -> GatewayResult<UpstreamReply> {
        debug!(url = %self.query_url, symbol = %symbol, "Requesting daily series from upstream");

        let started = Instant::now();
        let response = self
            .client
            .get(&self.query_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| GatewayError::FetchFailed(format!("HTTP request failed: {}", e.without_url())))?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::FetchFailed(format!("Failed to read body: {}", e.without_url())))?;

        Metrics::upstream_request(started.elapsed().as_secs_f64() * 1000.0);
        debug!(
            symbol = %symbol,
            status = status.as_u16(),
            bytes = body.len(),
            "Upstream replied"
        );

        Ok(UpstreamReply { status, body })
    }
}

/// Classify an upstream reply.
///
/// Returns the parsed payload unmodified when it carries neither an error nor
/// an advisory field.
pub fn classify(reply: UpstreamReply) -> GatewayResult<Value> {
    if !reply.status.is_success() {
        return Err(GatewayError::UpstreamStatus {
            status: reply.status,
            body: reply.body,
        });
    }

    let payload: Value = serde_json::from_str(&reply.body)
        .map_err(|e| GatewayError::FetchFailed(format!("Upstream body is not JSON: {e}")))?;

    if let Some(message) = payload.get(ERROR_MESSAGE_FIELD) {
        return Err(GatewayError::UpstreamMessage(field_text(message)));
    }

    if let Some(message) = ADVISORY_FIELDS.iter().find_map(|f| payload.get(*f)) {
        return Err(GatewayError::RateLimited(field_text(message)));
    }

    Ok(payload)
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
