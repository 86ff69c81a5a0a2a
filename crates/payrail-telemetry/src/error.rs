//! Telemetry error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Metric registration error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
