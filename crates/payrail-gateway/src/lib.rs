//! HTTP/JSON client for the card payment gateway.
//!
//! Thin, explicit wire layer: every endpoint gets a typed request/response
//! pair and every call carries the bearer-token and merchant headers. All
//! decision logic (retries, routing, status mapping) lives above this
//! crate; the one seam is the [`GatewayApi`] trait so the orchestrator can
//! run against a scripted gateway in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::{GatewayApi, HttpGateway};
pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use types::{
    ApiResponse, BillingPayload, CardPayload, ChargeData, ChargeRequest, CustomerPayload,
    DevicePayload, FinalizeData, InitializeData, InitializeRequest, RedirectAuthData, RefundData,
    RefundRequest, RetrieveData, SubaccountInfo,
};
