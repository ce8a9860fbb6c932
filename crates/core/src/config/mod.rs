//! Application configuration with layered loading.
//!
//! Configuration is read once at process start using figment, from:
//!
//! 1. Environment variables (WSEARCH_*)
//! 2. TOML config file (if WSEARCH_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WSEARCH_*)
/// 2. TOML config file (if WSEARCH_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the article service. Every request path is relative to it.
    ///
    /// Set via WSEARCH_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via WSEARCH_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional HTTP request timeout in milliseconds.
    ///
    /// Unset means the transport default applies.
    /// Set via WSEARCH_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Seconds an entry with no subscribers survives before it may be pruned.
    ///
    /// Set via WSEARCH_KEEP_UNUSED_SECS environment variable.
    #[serde(default = "default_keep_unused_secs")]
    pub keep_unused_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".into()
}

fn default_user_agent() -> String {
    "wsearch/0.1".into()
}

fn default_keep_unused_secs() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: None,
            keep_unused_secs: default_keep_unused_secs(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Retention window for unsubscribed cache entries.
    pub fn keep_unused(&self) -> Duration {
        Duration::from_secs(self.keep_unused_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WSEARCH_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(Env::prefixed("WSEARCH_").map(|key| key.as_str().to_lowercase().into())))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        tracing::debug!(base_url = %config.base_url, "configuration loaded");

        Ok(config)
    }
}
