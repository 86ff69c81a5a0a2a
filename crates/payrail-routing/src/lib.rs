//! Subaccount selection and rolling success-rate metrics.
//!
//! Routes each payment to the merchant subaccount most likely to authorize
//! it: a weighted score over historical success rate and recency, with a
//! minimum-health threshold and a configurable fallback when every
//! subaccount is below it.

pub mod error;
pub mod selector;

pub use error::{RoutingError, RoutingResult};
pub use selector::{SelectionConfig, SubaccountMetrics, SubaccountSelector};
