//! stockdash-gateway - server-side quote proxy.
//!
//! Receives a symbol on `GET /api/stock?symbol=<SYMBOL>`, forwards exactly one
//! request to the upstream market-data provider, and normalizes the outcome:
//!
//! | upstream reply                      | gateway response              |
//! |-------------------------------------|-------------------------------|
//! | non-2xx                             | same status, `{"error": body}`|
//! | `"Error Message"` field             | 500 `{"error": msg}`          |
//! | `"Note"` / `"Information"` field    | 429 `{"error": msg}`          |
//! | anything else                       | 200, payload unmodified       |
//! | transport / decode failure          | 500 generic fetch failure     |
//!
//! The gateway keeps no per-request state and never retries.
//!
//! # Usage
//!
//! ```ignore
//! use stockdash_gateway::{run_server, GatewayConfig};
//!
//! let config = GatewayConfig::default().with_api_key_from_env();
//! run_server(config).await?;
//! ```

mod config;
mod error;
mod server;
mod upstream;

pub use config::{GatewayConfig, API_KEY_ENV_VARS};
pub use error::{GatewayError, GatewayResult, FETCH_FAILED_MESSAGE};
pub use server::{create_router, run_server, GatewayState, StockQuery};
pub use upstream::{classify, UpstreamClient, UpstreamReply, ADVISORY_FIELDS, ERROR_MESSAGE_FIELD};
