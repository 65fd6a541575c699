//! Quote gateway client.
//!
//! Trait-based so the controller can be driven by an in-process mock in
//! tests and by the real HTTP gateway in the CLI.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Client;
use serde_json::Value;
use stockdash_core::Symbol;
use tracing::debug;

use crate::error::{DashboardError, DashboardResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Raw gateway reply: HTTP status and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayReply {
    pub status: u16,
    pub body: String,
}

impl GatewayReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Reply with a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of a JSON error envelope, if present.
    pub fn error_message(&self) -> Option<String> {
        let body: Value = serde_json::from_str(&self.body).ok()?;
        body.get("error")?.as_str().map(str::to_string)
    }
}

/// Access to the quote gateway.
pub trait QuoteGateway: Send + Sync {
    /// Issue one `GET /api/stock?symbol=...` request.
    ///
    /// Only transport failures are errors; any HTTP status is a reply.
    fn fetch_stock<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, DashboardResult<GatewayReply>>;
}

/// HTTP client for a running gateway.
#[derive(Debug, Clone)]
pub struct HttpQuoteGateway {
    client: Client,
    endpoint: String,
}

impl HttpQuoteGateway {
    /// Create a client for the gateway at `base_url` (e.g. "http://127.0.0.1:3000").
    pub fn new(base_url: &str, timeout: Duration) -> DashboardResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DashboardError::Fetch(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/stock", base_url.trim_end_matches('/')),
        })
    }
}

impl QuoteGateway for HttpQuoteGateway {
    fn fetch_stock<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, DashboardResult<GatewayReply>> {
        Box::pin(async move {
            debug!(endpoint = %self.endpoint, symbol = %symbol, "Calling quote gateway");

            let response = self
                .client
                .get(&self.endpoint)
                .query(&[("symbol", symbol.as_str())])
                .send()
                .await
                .map_err(|e| DashboardError::Fetch(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| DashboardError::Fetch(e.to_string()))?;

            Ok(GatewayReply { status, body })
        })
    }
}

/// Scripted gateway for testing.
///
/// Replies are consumed in order; each may be delayed to simulate a slow
/// network. When the script is exhausted, calls fail with a fetch error.
#[derive(Debug, Default)]
pub struct MockQuoteGateway {
    replies: Mutex<VecDeque<(Duration, DashboardResult<GatewayReply>)>>,
    calls: Mutex<Vec<Symbol>>,
}

impl MockQuoteGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an immediate reply.
    pub fn push_reply(&self, reply: GatewayReply) {
        self.push_delayed(Duration::ZERO, Ok(reply));
    }

    /// Queue an immediate transport failure.
    pub fn push_error(&self, message: &str) {
        self.push_delayed(Duration::ZERO, Err(DashboardError::Fetch(message.to_string())));
    }

    /// Queue a result delivered after `delay`.
    pub fn push_delayed(&self, delay: Duration, result: DashboardResult<GatewayReply>) {
        self.replies.lock().push_back((delay, result));
    }

    /// Symbols requested so far, in call order.
    pub fn calls(&self) -> Vec<Symbol> {
        self.calls.lock().clone()
    }
}

impl QuoteGateway for MockQuoteGateway {
    fn fetch_stock<'a>(&'a self, symbol: &'a Symbol) -> BoxFuture<'a, DashboardResult<GatewayReply>> {
        Box::pin(async move {
            self.calls.lock().push(symbol.clone());
            let next = self.replies.lock().pop_front();

            match next {
                Some((delay, result)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    result
                }
                None => Err(DashboardError::Fetch("no scripted reply".to_string())),
            }
        })
    }
}
