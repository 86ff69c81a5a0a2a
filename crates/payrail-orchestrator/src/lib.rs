//! Payment lifecycle orchestration.
//!
//! Sequences the initialize → authorize → finalize/retrieve/refund flow
//! against the gateway: routes each payment to the best subaccount, runs
//! every call under the retry executor, carries card data between steps in
//! the encryption envelope, and maps gateway statuses to the internal
//! vocabulary.

pub mod error;
pub mod orchestrator;
pub mod request;

pub use error::{PaymentError, PaymentResult};
pub use orchestrator::{
    OrchestratorConfig, PaymentOrchestrator, RefundOutcome, RetrievedPayment,
};
