//! Gateway configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variables consulted for the upstream API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["STOCKDASH_API_KEY", "ALPHA_VANTAGE_API_KEY"];

/// Quote gateway configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the upstream provider (without path).
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    /// Upstream request timeout in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    pub upstream_timeout_ms: u64,
    /// Allow cross-origin browser requests.
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
    /// Upstream API key. Never read from the config file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_url() -> String {
    "https://www.alphavantage.co".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    10_000
}

fn default_cors_enabled() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upstream_url: default_upstream_url(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            cors_enabled: default_cors_enabled(),
            api_key: None,
        }
    }
}

impl GatewayConfig {
    /// Set the API key. Blank keys count as missing.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.trim().is_empty() {
            None
        } else {
            Some(key)
        };
        self
    }

    /// Fill the API key from the environment (first non-empty of `API_KEY_ENV_VARS`).
    pub fn with_api_key_from_env(self) -> Self {
        match API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|v| !v.trim().is_empty())
        {
            Some(key) => self.with_api_key(key),
            None => self,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upstream_url", &self.upstream_url)
            .field("upstream_timeout_ms", &self.upstream_timeout_ms)
            .field("cors_enabled", &self.cors_enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: GatewayConfig = from_json("{}");
        assert_eq!(config.port, 3000);
        assert_eq!(config.upstream_url, "https://www.alphavantage.co");
        assert!(config.cors_enabled);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_api_key_never_deserialized() {
        let config: GatewayConfig = from_json(r#"{"api_key":"leaked","port":8081}"#);
        assert_eq!(config.port, 8081);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        assert!(!GatewayConfig::default().with_api_key("  ").has_api_key());
        assert!(GatewayConfig::default().with_api_key("demo").has_api_key());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GatewayConfig::default().with_api_key("secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    fn from_json(json: &str) -> GatewayConfig {
        serde_json::from_str(json).unwrap()
    }
}
