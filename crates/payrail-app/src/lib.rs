//! Application wiring for the payrail binary.

pub mod config;
pub mod error;

pub use config::{AppConfig, CryptoConfig};
pub use error::{AppError, AppResult};
