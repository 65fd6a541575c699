//! HTTP server implementation using axum.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};
use stockdash_core::Symbol;
use stockdash_telemetry::Metrics;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::upstream::{classify, UpstreamClient};

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct GatewayState {
    config: Arc<GatewayConfig>,
    upstream: UpstreamClient,
}

impl GatewayState {
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let upstream = UpstreamClient::new(
            &config.upstream_url,
            Duration::from_millis(config.upstream_timeout_ms),
        )?;

        Ok(Self {
            config: Arc::new(config),
            upstream,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Query string of `GET /api/stock`.
#[derive(Debug, Deserialize)]
pub struct StockQuery {
    pub symbol: Option<String>,
}

/// Create the axum router.
pub fn create_router(state: GatewayState) -> Router {
    let cors_enabled = state.config.cors_enabled;

    let router = Router::new()
        .route("/api/stock", get(get_stock))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state);

    if cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
    } else {
        router
    }
}

/// Proxy one daily time series request.
async fn get_stock(
    State(state): State<GatewayState>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> Result<Json<Value>, GatewayError> {
    let raw_symbol = query.ok().and_then(|Query(q)| q.symbol);

    let result = proxy_daily(&state, raw_symbol.as_deref()).await;

    match &result {
        Ok(_) => Metrics::gateway_response("ok"),
        Err(e) => {
            Metrics::gateway_response(e.outcome());
            log_failure(raw_symbol.as_deref().unwrap_or(""), e);
        }
    }

    result.map(Json)
}

async fn proxy_daily(state: &GatewayState, raw_symbol: Option<&str>) -> GatewayResult<Value> {
    let symbol = raw_symbol
        .and_then(|s| Symbol::new(s).ok())
        .ok_or(GatewayError::BadRequest)?;

    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(GatewayError::ServerMisconfigured)?;

    let reply = state.upstream.fetch_daily(&symbol, api_key).await?;
    let payload = classify(reply)?;

    info!(symbol = %symbol, "Served daily series");
    Ok(payload)
}

fn log_failure(symbol: &str, err: &GatewayError) {
    match err {
        GatewayError::BadRequest => warn!("Rejected stock request without symbol"),
        GatewayError::ServerMisconfigured => {
            error!(symbol = %symbol, "Upstream API key is not configured")
        }
        GatewayError::UpstreamStatus { status, .. } => {
            warn!(symbol = %symbol, status = status.as_u16(), "Upstream returned non-success status")
        }
        GatewayError::UpstreamMessage(message) => {
            warn!(symbol = %symbol, message = %message, "Upstream reported an error")
        }
        GatewayError::RateLimited(message) => {
            warn!(symbol = %symbol, message = %message, "Upstream rate limit advisory")
        }
        GatewayError::FetchFailed(detail) => {
            error!(symbol = %symbol, detail = %detail, "Failed to fetch from upstream")
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics() -> Response {
    match Metrics::render() {
        Ok(text) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Run the gateway HTTP server until Ctrl-C.
pub async fn run_server(
    config: GatewayConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if !config.has_api_key() {
        // Requests will answer 500 until a key is provided
        warn!("No upstream API key configured; /api/stock will report a server misconfiguration");
    }

    let addr = config.bind_address();
    let state = GatewayState::new(config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Starting quote gateway");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Quote gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn router(config: GatewayConfig) -> Router {
        create_router(GatewayState::new(config).unwrap())
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_symbol_is_bad_request() {
        let app = router(GatewayConfig::default().with_api_key("demo"));

        let (status, body) = send(app.clone(), "/api/stock").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Symbol is required"}));

        let (status, _) = send(app, "/api/stock?symbol=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_misconfigured() {
        let app = router(GatewayConfig::default());

        let (status, body) = send(app, "/api/stock?symbol=IBM").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server misconfigured: missing API key");
    }

    #[tokio::test]
    async fn test_bad_request_checked_before_api_key() {
        let app = router(GatewayConfig::default());

        let (status, _) = send(app, "/api/stock").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_fetch_failure() {
        let config = GatewayConfig {
            // Port 9 (discard) on loopback is not expected to accept HTTP
            upstream_url: "http://127.0.0.1:9".to_string(),
            upstream_timeout_ms: 500,
            ..GatewayConfig::default()
        }
        .with_api_key("demo");

        let (status, body) = send(router(config), "/api/stock?symbol=IBM").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to fetch stock data"}));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(router(GatewayConfig::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
