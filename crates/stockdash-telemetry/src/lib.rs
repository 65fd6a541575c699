//! Prometheus metrics and structured logging for stockdash.
//!
//! - Structured logging with tracing (JSON in production, compact otherwise)
//! - Prometheus counters for gateway outcomes and upstream latency

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
