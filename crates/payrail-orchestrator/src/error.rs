//! Orchestrator error taxonomy.
//!
//! One tagged enum surfaced to callers; the near-identical per-operation
//! error classes of older service variants collapse into this.

use payrail_crypto::CryptoError;
use payrail_gateway::GatewayError;
use payrail_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Bad input: malformed card, missing required fields. Never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A gateway interaction failed after retries were exhausted.
    #[error("Payment error during {operation} (reference {reference}, subaccount {subaccount:?}): {source}")]
    Gateway {
        operation: &'static str,
        reference: String,
        subaccount: Option<String>,
        #[source]
        source: GatewayError,
    },

    /// Gateway-side 5xx failure after retries were exhausted.
    #[error("Gateway internal error during {operation} (reference {reference}, subaccount {subaccount:?}): {source}")]
    Internal {
        operation: &'static str,
        reference: String,
        subaccount: Option<String>,
        #[source]
        source: GatewayError,
    },

    /// Corrupt or mismatched envelope on authorize.
    #[error("Decryption error: {0}")]
    Decryption(#[from] CryptoError),

    /// No usable subaccount for routing.
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),
}

pub type PaymentResult<T> = Result<T, PaymentError>;
