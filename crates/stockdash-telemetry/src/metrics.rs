//! Prometheus metrics for stockdash.
//!
//! # Panics
//!
//! Registration panics on first use if a metric name is registered twice.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, CounterVec, Encoder,
    Histogram, IntCounter, TextEncoder,
};

/// Gateway responses by outcome.
/// Labels: outcome (ok/bad_request/misconfigured/upstream_status/upstream_error/rate_limited/fetch_failed)
pub static GATEWAY_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "stockdash_gateway_requests_total",
        "Total /api/stock responses by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Upstream round-trip latency in milliseconds.
pub static UPSTREAM_LATENCY_MS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "stockdash_upstream_latency_ms",
        "Upstream provider round-trip latency in milliseconds",
        vec![25.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0]
    )
    .unwrap()
});

/// Total upstream requests issued.
pub static UPSTREAM_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "stockdash_upstream_requests_total",
        "Total requests issued to the upstream provider"
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a gateway response outcome.
    pub fn gateway_response(outcome: &str) {
        GATEWAY_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record one upstream request and its latency.
    pub fn upstream_request(latency_ms: f64) {
        UPSTREAM_REQUESTS_TOTAL.inc();
        UPSTREAM_LATENCY_MS.observe(latency_ms);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_recorded_outcome() {
        Metrics::gateway_response("rate_limited");
        Metrics::upstream_request(12.5);

        let text = Metrics::render().unwrap();
        assert!(text.contains("stockdash_gateway_requests_total"));
        assert!(text.contains("outcome=\"rate_limited\""));
        assert!(text.contains("stockdash_upstream_latency_ms"));
    }
}
