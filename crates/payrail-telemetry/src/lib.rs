//! Structured logging and Prometheus metrics for payrail.
//!
//! The metrics sink is an explicitly constructed collaborator owning its
//! own registry; it is injected into the orchestrator rather than living
//! in process-wide statics, so two orchestrators never share counters by
//! accident.

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Telemetry;
