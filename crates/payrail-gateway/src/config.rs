//! Gateway connection configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the gateway HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL, no trailing slash.
    pub base_url: String,
    /// Bearer secret key sent on every call.
    #[serde(default)]
    pub secret_key: String,
    /// Per-merchant API key.
    #[serde(default)]
    pub api_key: String,
    /// Merchant id header value.
    pub merchant_id: String,
    /// Per-call timeout in seconds. Default: 30.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}
