//! Application error types.

use thiserror::Error;

/// Configuration and wiring failures; everything downstream of wiring is
/// reported through the member crates' own error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
