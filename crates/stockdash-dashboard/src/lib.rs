//! stockdash-dashboard - dashboard controller.
//!
//! Holds the UI state of the quote dashboard and everything that changes it:
//! - `state`: `DashboardState` and its pure `apply(event)` transitions
//! - `controller`: gateway calls, request-id staleness, persistence, initial load
//! - `gateway_client`: `QuoteGateway` capability (HTTP and scripted mock)
//! - `store`: `KeyValueStore` capability (memory and JSON file)
//!
//! # Usage
//!
//! ```ignore
//! use stockdash_dashboard::{Controller, DashboardConfig, FileStore, HttpQuoteGateway};
//!
//! let config = DashboardConfig::default();
//! let gateway = HttpQuoteGateway::new(&config.gateway_url, config.request_timeout())?;
//! let store = FileStore::open_in(&config.data_dir)?;
//! let controller = Controller::new(gateway, store, config);
//!
//! controller.set_symbol("IBM");
//! controller.fetch().await?;
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway_client;
pub mod state;
pub mod store;

pub use config::DashboardConfig;
pub use controller::{initial_symbol, Controller, CsvExport, FetchOutcome, SYMBOL_PARAM};
pub use error::{DashboardError, DashboardResult, StoreError, StoreResult};
pub use gateway_client::{BoxFuture, GatewayReply, HttpQuoteGateway, MockQuoteGateway, QuoteGateway};
pub use state::{DashboardEvent, DashboardState, RequestId};
pub use store::{load_json, save_json, FileStore, KeyValueStore, MemoryStore, FAVORITES_KEY, HISTORY_KEY};
