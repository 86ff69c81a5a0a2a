//! The payment orchestrator.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use payrail_core::{major_units, Payment, PaymentStatus, ThreeDsChallenge};
use payrail_crypto::{EncryptionCodec, EnvelopePayload};
use payrail_gateway::{GatewayApi, GatewayError};
use payrail_retry::{RetryExecutor, RetryPolicy};
use payrail_routing::{SubaccountMetrics, SubaccountSelector};
use payrail_telemetry::Telemetry;

use crate::error::{PaymentError, PaymentResult};
use crate::request;

/// Orchestrator-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Base URL for payment callback construction, no trailing slash.
    pub callback_base_url: String,
    /// Retry policy applied to every gateway call.
    #[serde(default)]
    pub retry: RetryPolicy,
}

/// Result of `retrieve_payment`.
#[derive(Debug, Clone)]
pub struct RetrievedPayment {
    pub status: PaymentStatus,
    pub message: String,
    /// Parsed embedded gateway-response blob; `None` when absent or when
    /// the blob is not valid JSON (that is not an error).
    pub gateway_detail: Option<serde_json::Value>,
}

/// Result of `refund_payment`.
#[derive(Debug, Clone)]
pub struct RefundOutcome {
    pub status: PaymentStatus,
    pub reference: String,
    pub message: String,
}

/// Sequences the payment lifecycle against the gateway.
///
/// Each public operation is an independent entry point; lifecycle state is
/// implicit in which provider references the caller holds. Safe to share
/// across concurrent payments.
pub struct PaymentOrchestrator<G> {
    gateway: G,
    selector: SubaccountSelector,
    executor: RetryExecutor,
    codec: EncryptionCodec,
    telemetry: Arc<Telemetry>,
    config: OrchestratorConfig,
}

impl<G: GatewayApi> PaymentOrchestrator<G> {
    pub fn new(
        gateway: G,
        selector: SubaccountSelector,
        codec: EncryptionCodec,
        telemetry: Arc<Telemetry>,
        config: OrchestratorConfig,
    ) -> Self {
        let executor = RetryExecutor::with_observer(telemetry.clone());
        Self {
            gateway,
            selector,
            executor,
            codec,
            telemetry,
            config,
        }
    }

    /// Initialize a payment: route it to a subaccount, register it with
    /// the gateway, and seal the card residue for the authorize step.
    pub async fn initialize_payment(&self, mut payment: Payment) -> PaymentResult<Payment> {
        let started = Instant::now();
        payment
            .card
            .validate_for_initialize()
            .map_err(|e| PaymentError::Validation(e.to_string()))?;
        let amount = major_units(payment.amount_minor, &payment.currency)
            .map_err(|e| PaymentError::Validation(e.to_string()))?;

        let reference = payment
            .reference
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // Live subaccount set; selection is always a member of it.
        let subaccounts = self
            .executor
            .execute("list_subaccounts", &self.config.retry, || {
                self.gateway.list_subaccounts()
            })
            .await
            .map_err(|source| self.wrap("list_subaccounts", &reference, None, source))?
            .data
            .unwrap_or_default();

        let active_ids: Vec<String> = subaccounts
            .iter()
            .filter(|s| s.active)
            .map(|s| s.uuid.clone())
            .collect();
        self.selector.register(active_ids.iter().cloned());
        let subaccount_id = self.selector.select_among(&active_ids)?;
        self.telemetry.record_selection(&subaccount_id);

        let gateway_request = request::build_initialize_request(
            &payment,
            &reference,
            &subaccount_id,
            amount,
            &self.config.callback_base_url,
        );

        let response = match self
            .executor
            .execute("initialize", &self.config.retry, || {
                self.gateway.initialize(&gateway_request)
            })
            .await
        {
            Ok(response) => response,
            Err(source) => {
                // A subaccount was already chosen: settle the attempt
                // against it before propagating.
                self.selector.record_outcome(&subaccount_id, false);
                self.telemetry.record_payment("initialize", "ERROR");
                return Err(self.wrap("initialize", &reference, Some(subaccount_id), source));
            }
        };

        let status = match &response.data {
            Some(data) => PaymentStatus::from_gateway(&data.status),
            None if response.status => PaymentStatus::Pending,
            None => PaymentStatus::Failed,
        };
        self.selector
            .record_outcome(&subaccount_id, status.is_routing_success());

        // Seal the card residue plus the routing decision for authorize.
        let envelope = EnvelopePayload {
            card_number: payment.card.pan.clone().unwrap_or_default(),
            expiry_month: payment.card.expiry_month.unwrap_or_default(),
            expiry_year: payment.card.expiry_year.unwrap_or_default(),
            cvv: payment.card.cvv.clone().unwrap_or_default(),
            subaccount_id: subaccount_id.clone(),
        }
        .seal(&self.codec)?;
        payment.card.encrypted = Some(envelope);
        payment.card.scrub_plaintext();

        payment.provider_reference = response.data.map(|d| d.transaction_id);
        payment.reference = Some(reference.clone());
        payment.status = status;
        payment.message = Some(response.message);

        self.telemetry.record_payment("initialize", status.as_str());
        self.telemetry
            .observe_duration("initialize", started.elapsed().as_secs_f64());
        info!(
            reference = %reference,
            subaccount = %subaccount_id,
            status = status.as_str(),
            "Payment initialized"
        );
        Ok(payment)
    }

    /// Authorize an initialized payment: open the envelope, charge, and
    /// surface any 3-D-Secure challenge for an external UI to render.
    pub async fn authorize_payment(&self, mut payment: Payment) -> PaymentResult<Payment> {
        let started = Instant::now();
        let sealed = payment.card.encrypted.clone().ok_or_else(|| {
            PaymentError::Validation("card instrument carries no encrypted envelope".into())
        })?;
        let transaction_id = payment.provider_reference.clone().ok_or_else(|| {
            PaymentError::Validation("payment has no provider reference; initialize first".into())
        })?;
        let amount = major_units(payment.amount_minor, &payment.currency)
            .map_err(|e| PaymentError::Validation(e.to_string()))?;

        let residue = EnvelopePayload::open(&self.codec, &sealed)?;
        let subaccount_id = residue.subaccount_id.clone();

        let gateway_request =
            request::build_charge_request(&payment, &transaction_id, &subaccount_id, amount);

        let response = match self
            .executor
            .execute("charge", &self.config.retry, || {
                self.gateway.charge(&gateway_request)
            })
            .await
        {
            Ok(response) => response,
            Err(source) => {
                self.selector.record_outcome(&subaccount_id, false);
                self.telemetry.record_payment("authorize", "ERROR");
                return Err(self.wrap("charge", &transaction_id, Some(subaccount_id), source));
            }
        };

        let status = match &response.data {
            Some(data) => PaymentStatus::from_gateway(&data.status),
            None if response.status => PaymentStatus::Pending,
            None => PaymentStatus::Failed,
        };
        self.selector
            .record_outcome(&subaccount_id, status.is_routing_success());

        payment.three_ds = response.data.as_ref().and_then(|d| {
            d.redirect_auth_data.as_ref().map(|r| ThreeDsChallenge {
                acs_url: r.acs_url.clone(),
                challenge_token: r.challenge_token.clone(),
            })
        });
        if payment.three_ds.is_some() {
            debug!(transaction_id = %transaction_id, "Authorize returned a 3DS challenge");
        }
        if let Some(data) = response.data {
            payment.provider_reference = Some(data.reference);
        }
        payment.status = status;
        payment.message = Some(response.message);

        self.telemetry.record_payment("authorize", status.as_str());
        self.telemetry
            .observe_duration("authorize", started.elapsed().as_secs_f64());
        info!(
            transaction_id = %transaction_id,
            subaccount = %subaccount_id,
            status = status.as_str(),
            three_ds = payment.three_ds.is_some(),
            "Payment authorized"
        );
        Ok(payment)
    }

    /// Fetch the current status of a payment.
    ///
    /// A 404 from the gateway is a valid "not found" domain result, not an
    /// error; a malformed embedded gateway-response blob degrades to "no
    /// extra detail".
    pub async fn retrieve_payment(&self, payment_id: &str) -> PaymentResult<RetrievedPayment> {
        let started = Instant::now();
        let response = match self
            .executor
            .execute("retrieve", &self.config.retry, || {
                self.gateway.retrieve(payment_id)
            })
            .await
        {
            Ok(response) => response,
            Err(source) if source.status() == Some(404) => {
                debug!(payment_id, "Payment not found at gateway");
                self.telemetry.record_payment("retrieve", "NOT_FOUND");
                return Ok(RetrievedPayment {
                    status: PaymentStatus::Failed,
                    message: "Payment not found".into(),
                    gateway_detail: None,
                });
            }
            Err(source) => {
                return Err(self.wrap("retrieve", payment_id, None, source));
            }
        };

        let (status, gateway_detail) = match response.data {
            Some(data) => {
                let detail = data.gateway_response.as_deref().and_then(|raw| {
                    match serde_json::from_str::<serde_json::Value>(raw) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            debug!(payment_id, error = %e, "Gateway response blob is not JSON");
                            None
                        }
                    }
                });
                (PaymentStatus::from_gateway(&data.status), detail)
            }
            None => (PaymentStatus::Pending, None),
        };

        self.telemetry.record_payment("retrieve", status.as_str());
        self.telemetry
            .observe_duration("retrieve", started.elapsed().as_secs_f64());
        Ok(RetrievedPayment {
            status,
            message: response.message,
            gateway_detail,
        })
    }

    /// Settle a pending payment.
    ///
    /// Success is the call returning without error; the response body is
    /// logged but not inspected. That asymmetry with the other operations
    /// comes from the gateway contract giving finalize no status
    /// vocabulary.
    pub async fn finalize_payment(&self, payment_id: &str) -> PaymentResult<()> {
        let started = Instant::now();
        let response = self
            .executor
            .execute("finalize", &self.config.retry, || {
                self.gateway.finalize(payment_id)
            })
            .await
            .map_err(|source| self.wrap("finalize", payment_id, None, source))?;

        self.telemetry.record_payment("finalize", "SUCCESS");
        self.telemetry
            .observe_duration("finalize", started.elapsed().as_secs_f64());
        info!(payment_id, message = %response.message, "Payment finalized");
        Ok(())
    }

    /// Initiate a refund. Success is the gateway's top-level boolean
    /// status flag, not a status string.
    pub async fn refund_payment(
        &self,
        payment: &Payment,
        reason: Option<&str>,
    ) -> PaymentResult<RefundOutcome> {
        let started = Instant::now();
        let reference = payment
            .provider_reference
            .clone()
            .ok_or_else(|| {
                PaymentError::Validation("refund requires a provider reference".into())
            })?;
        let amount = major_units(payment.amount_minor, &payment.currency)
            .map_err(|e| PaymentError::Validation(e.to_string()))?;

        let gateway_request = request::build_refund_request(
            &reference,
            reason.unwrap_or("requested_by_customer"),
            amount,
        );

        let response = self
            .executor
            .execute("refund", &self.config.retry, || {
                self.gateway.refund(&gateway_request)
            })
            .await
            .map_err(|source| self.wrap("refund", &reference, None, source))?;

        let status = if response.status {
            PaymentStatus::Success
        } else {
            warn!(reference = %reference, message = %response.message, "Refund declined");
            PaymentStatus::Failed
        };
        let refund_reference = response
            .data
            .and_then(|d| d.reference)
            .unwrap_or_else(|| reference.clone());

        self.telemetry.record_payment("refund", status.as_str());
        self.telemetry
            .observe_duration("refund", started.elapsed().as_secs_f64());
        info!(reference = %reference, status = status.as_str(), "Refund initiated");
        Ok(RefundOutcome {
            status,
            reference: refund_reference,
            message: response.message,
        })
    }

    /// Snapshot of per-subaccount routing metrics, for operational
    /// visibility.
    pub fn subaccount_metrics(&self) -> Vec<SubaccountMetrics> {
        self.selector.snapshot()
    }

    /// Wrap a terminal gateway failure with correlation context. 5xx maps
    /// to the internal-error variant.
    fn wrap(
        &self,
        operation: &'static str,
        reference: &str,
        subaccount: Option<String>,
        source: GatewayError,
    ) -> PaymentError {
        match source.status() {
            Some(status) if status >= 500 => PaymentError::Internal {
                operation,
                reference: reference.to_string(),
                subaccount,
                source,
            },
            _ => PaymentError::Gateway {
                operation,
                reference: reference.to_string(),
                subaccount,
                source,
            },
        }
    }
}

impl<G> std::fmt::Debug for PaymentOrchestrator<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
