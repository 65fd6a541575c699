//! Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use stockdash_dashboard::DashboardConfig;
use stockdash_gateway::GatewayConfig;

use crate::error::{AppError, AppResult};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "STOCKDASH_CONFIG";

/// Config file used when neither `--config` nor `STOCKDASH_CONFIG` is set.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Top-level configuration, one section per component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log filter used when `RUST_LOG` is unset (e.g. "info").
    #[serde(default)]
    pub log_level: Option<String>,
    /// Quote gateway server.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Dashboard controller.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Resolve the config path: CLI arg > `STOCKDASH_CONFIG` > default.
    pub fn resolve_path(cli_path: Option<String>) -> String {
        cli_path
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path = %path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }
}
