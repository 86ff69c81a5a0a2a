//! Routing error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("No subaccounts registered")]
    NoSubaccounts,

    /// Only raised under strict health policy; the default policy degrades
    /// to best-available instead.
    #[error("No subaccount meets the minimum success rate")]
    NoHealthySubaccount,
}

pub type RoutingResult<T> = Result<T, RoutingError>;
