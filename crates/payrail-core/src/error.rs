//! Core error types.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid card: {0}")]
    InvalidCard(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
