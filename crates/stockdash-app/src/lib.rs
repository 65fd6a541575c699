//! stockdash application.
//!
//! Wires the quote gateway and the dashboard controller into the `stockdash`
//! binary:
//! - `serve`: run the quote gateway HTTP server
//! - `quote`: fetch one symbol through a running gateway and print the dashboard
//! - `favorite`: toggle a symbol in the persisted favorites
//! - `history`: show (or clear) the persisted search history

pub mod config;
pub mod error;
pub mod render;

pub use config::{AppConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
pub use error::{AppError, AppResult};
pub use render::render_dashboard;
