//! Gateway error types and their retry classification.

use payrail_retry::{classify_status, Classification, ClassifyError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Non-2xx response from the gateway.
    #[error("Gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Gateway request timed out: {0}")]
    Timeout(String),

    /// DNS failure or connection refused.
    #[error("Gateway unreachable: {0}")]
    Connect(String),

    #[error("Failed to decode gateway response: {0}")]
    Decode(String),

    #[error("Gateway transport error: {0}")]
    Transport(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl GatewayError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// HTTP status code, when the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ClassifyError for GatewayError {
    fn classification(&self) -> Classification {
        match self {
            Self::Http { status, .. } => classify_status(*status),
            Self::Timeout(_) => Classification::retryable(ErrorKind::Timeout),
            Self::Connect(_) => Classification::retryable(ErrorKind::Unreachable),
            // No HTTP context: default to non-retryable rather than masking
            // an unexpected bug as transient noise.
            Self::Decode(_) | Self::Transport(_) | Self::Build(_) => {
                Classification::terminal(ErrorKind::Unexpected)
            }
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
