//! Error classification and bounded exponential-backoff retry.
//!
//! Transient gateway failures (429, 5xx, timeouts, unreachable host) are
//! retried with exponential backoff; everything else surfaces immediately.
//! Delays suspend only the calling task.

pub mod classify;
pub mod executor;

pub use classify::{classify_status, Classification, ClassifyError, ErrorKind};
pub use executor::{RetryExecutor, RetryObserver, RetryPolicy};
