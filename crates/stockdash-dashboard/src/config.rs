//! Dashboard configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Dashboard controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the quote gateway.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    /// Directory holding the persisted history/favorites file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Delay before the fetch scheduled by an initial `?symbol=` URL.
    #[serde(default = "default_initial_fetch_delay_ms")]
    pub initial_fetch_delay_ms: u64,
    /// Gateway request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_initial_fetch_delay_ms() -> u64 {
    100
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            data_dir: default_data_dir(),
            initial_fetch_delay_ms: default_initial_fetch_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl DashboardConfig {
    pub fn initial_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.initial_fetch_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"gateway_url": "http://gw:8080"}"#).unwrap();

        assert_eq!(config.gateway_url, "http://gw:8080");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.initial_fetch_delay(), Duration::from_millis(100));
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }
}
