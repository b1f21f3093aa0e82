//! # Basket Config
//!
//! Unified single-file configuration for the basket bot. A single
//! `basket.yaml` configures the app identity, the item store backend,
//! the recognizer and observability settings.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasketConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_env(),
        }
    }
}

fn default_app_name() -> String {
    "basket".to_string()
}

fn default_env() -> String {
    "development".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// "in_memory" or "http".
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// Base URL of the list API; required for the http backend.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            endpoint: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_store_backend() -> String {
    "in_memory".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognizerConfig {
    /// "none" or "http".
    #[serde(default = "default_recognizer_backend")]
    pub backend: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_slot")]
    pub slot: String,
    #[serde(default = "default_recognizer_timeout")]
    pub timeout_secs: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            backend: default_recognizer_backend(),
            endpoint: None,
            app_id: None,
            api_key: None,
            slot: default_slot(),
            timeout_secs: default_recognizer_timeout(),
        }
    }
}

fn default_recognizer_backend() -> String {
    "none".to_string()
}

fn default_slot() -> String {
    "production".to_string()
}

fn default_recognizer_timeout() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load the full configuration from a YAML file.
pub fn load_config(path: &Path) -> Result<BasketConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: BasketConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &BasketConfig) -> Result<(), ConfigError> {
    if config.app.name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "app.name must not be empty".to_string(),
        ));
    }

    match config.store.backend.as_str() {
        "in_memory" => {}
        "http" => {
            if config.store.endpoint.as_deref().unwrap_or("").trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "store.endpoint is required for the http backend".to_string(),
                ));
            }
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "unknown store backend '{other}'"
            )));
        }
    }

    match config.recognizer.backend.as_str() {
        "none" => {}
        "http" => {
            for (field, value) in [
                ("recognizer.endpoint", &config.recognizer.endpoint),
                ("recognizer.app_id", &config.recognizer.app_id),
                ("recognizer.api_key", &config.recognizer.api_key),
            ] {
                if value.as_deref().unwrap_or("").trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "{field} is required for the http backend"
                    )));
                }
            }
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "unknown recognizer backend '{other}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: BasketConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.app.name, "basket");
        assert_eq!(config.store.backend, "in_memory");
        assert_eq!(config.recognizer.backend, "none");
        assert_eq!(config.observability.log_level, "info");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_http_store_requires_endpoint() {
        let config: BasketConfig = serde_yaml::from_str("store:\n  backend: http\n").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));

        let config: BasketConfig = serde_yaml::from_str(
            "store:\n  backend: http\n  endpoint: http://localhost:7071/api\n",
        )
        .unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let config: BasketConfig = serde_yaml::from_str("store:\n  backend: cosmos\n").unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_http_recognizer_requires_credentials() {
        let config: BasketConfig = serde_yaml::from_str(
            "recognizer:\n  backend: http\n  endpoint: https://example.net\n",
        )
        .unwrap();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Invalid(_))
        ));
    }
}
