//! Failure classification.
//!
//! Maps a failed gateway call to a domain error kind and a retry decision.
//! Anything unmatched defaults to non-retryable so unexpected bugs are not
//! masked as transient noise.

/// Domain error kind for a failed gateway interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Authorization,
    NotFound,
    Conflict,
    RateLimited,
    GatewayInternal,
    Timeout,
    Unreachable,
    Unexpected,
}

impl ErrorKind {
    /// Stable label for telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate_limited",
            Self::GatewayInternal => "gateway_internal",
            Self::Timeout => "timeout",
            Self::Unreachable => "unreachable",
            Self::Unexpected => "unexpected",
        }
    }
}

/// Classification outcome: what kind of failure, and whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ErrorKind,
    pub retryable: bool,
}

impl Classification {
    pub fn retryable(kind: ErrorKind) -> Self {
        Self {
            kind,
            retryable: true,
        }
    }

    pub fn terminal(kind: ErrorKind) -> Self {
        Self {
            kind,
            retryable: false,
        }
    }
}

/// Implemented by error types the retry executor can reason about.
pub trait ClassifyError {
    fn classification(&self) -> Classification;
}

/// Classify an HTTP status code from the gateway.
pub fn classify_status(status: u16) -> Classification {
    match status {
        400 | 422 => Classification::terminal(ErrorKind::Validation),
        401 => Classification::terminal(ErrorKind::Authentication),
        403 => Classification::terminal(ErrorKind::Authorization),
        404 => Classification::terminal(ErrorKind::NotFound),
        409 => Classification::terminal(ErrorKind::Conflict),
        429 => Classification::retryable(ErrorKind::RateLimited),
        s if s >= 500 => Classification::retryable(ErrorKind::GatewayInternal),
        _ => Classification::terminal(ErrorKind::Unexpected),
    }
}
