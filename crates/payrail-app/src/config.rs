//! Application configuration.
//!
//! One explicit struct loaded from TOML; secrets can be supplied or
//! overridden through environment variables so key material stays out of
//! config files.

use std::path::Path;

use serde::{Deserialize, Serialize};

use payrail_gateway::GatewayConfig;
use payrail_orchestrator::OrchestratorConfig;
use payrail_routing::SelectionConfig;

use crate::error::{AppError, AppResult};

/// Symmetric encryption material for the card-data envelope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CryptoConfig {
    #[serde(default)]
    pub encryption_key: String,
    #[serde(default)]
    pub encryption_iv: String,
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub crypto: CryptoConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    pub orchestrator: OrchestratorConfig,
}

impl AppConfig {
    /// Load configuration, resolving the path from the argument, the
    /// `PAYRAIL_CONFIG` env var, or the default location, in that order.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let config_path = path
            .map(str::to_string)
            .or_else(|| std::env::var("PAYRAIL_CONFIG").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Err(AppError::Config(format!(
                "Config file not found: {config_path}"
            )));
        }
        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Secrets from the environment win over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(secret_key) = std::env::var("PAYRAIL_SECRET_KEY") {
            self.gateway.secret_key = secret_key;
        }
        if let Ok(api_key) = std::env::var("PAYRAIL_API_KEY") {
            self.gateway.api_key = api_key;
        }
        if let Ok(key) = std::env::var("PAYRAIL_ENCRYPTION_KEY") {
            self.crypto.encryption_key = key;
        }
        if let Ok(iv) = std::env::var("PAYRAIL_ENCRYPTION_IV") {
            self.crypto.encryption_iv = iv;
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.gateway.secret_key.is_empty() {
            return Err(AppError::Config(
                "gateway secret key missing (set PAYRAIL_SECRET_KEY)".into(),
            ));
        }
        if self.crypto.encryption_key.is_empty() {
            return Err(AppError::Config(
                "encryption key missing (set PAYRAIL_ENCRYPTION_KEY)".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [gateway]
        base_url = "https://gw.example.com"
        merchant_id = "m-1"
        secret_key = "sk-test"

        [crypto]
        encryption_key = "ek-test"
        encryption_iv = "iv-test"

        [selection]
        min_success_rate = 0.85

        [orchestrator]
        callback_base_url = "https://shop.example.com"

        [orchestrator.retry]
        max_attempts = 5
    "#;

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.gateway.base_url, "https://gw.example.com");
        assert_eq!(config.gateway.timeout_secs, 30, "default timeout");
        assert_eq!(config.selection.min_success_rate, 0.85);
        assert_eq!(config.selection.success_weight, 0.7, "default weight");
        assert_eq!(config.orchestrator.retry.max_attempts, 5);
        assert_eq!(config.orchestrator.retry.initial_delay_ms, 500, "default delay");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let mut config: AppConfig = toml::from_str(SAMPLE).unwrap();
        config.gateway.secret_key.clear();
        assert!(config.validate().is_err());
    }
}
