//! Wire types for the gateway's HTTP/JSON contract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Standard gateway response wrapper: boolean status flag, human message,
/// and a call-specific payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    // Explicit default path: plain #[serde(default)] would infer a
    // T: Default bound on the Deserialize impl.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// One subaccount entry from `GET /get-subaccount`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubaccountInfo {
    pub uuid: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub currencies: Vec<String>,
    /// Gateway-side metrics blob; informational only.
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub limits: Option<serde_json::Value>,
}

/// Card fields for the initialize call.
#[derive(Debug, Clone, Serialize)]
pub struct CardPayload {
    pub number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cvv: String,
}

/// Customer identity fields.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerPayload {
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Billing fields; country is alpha-3 by the time it gets here.
#[derive(Debug, Clone, Serialize)]
pub struct BillingPayload {
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Device fingerprint fields populated from request context.
#[derive(Debug, Clone, Serialize)]
pub struct DevicePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

/// `POST /v3/initialize` request body.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeRequest {
    /// Decimal major units, normalized from minor units.
    pub amount: Decimal,
    pub currency: String,
    pub reference: String,
    pub customer: CustomerPayload,
    pub subaccount_id: String,
    pub callback_url: String,
    pub device_information: DevicePayload,
    pub billing_information: BillingPayload,
    pub card: CardPayload,
}

/// `POST /v3/initialize` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeData {
    pub transaction_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// `POST /v2/charge` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    pub transaction_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub subaccount_id: String,
}

/// 3-D-Secure challenge descriptor, surfaced but never executed here.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectAuthData {
    pub acs_url: String,
    #[serde(rename = "creq")]
    pub challenge_token: String,
}

/// `POST /v2/charge` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct ChargeData {
    pub reference: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub redirect_auth_data: Option<RedirectAuthData>,
}

/// `GET /v3/payments/{id}` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveData {
    #[serde(default)]
    pub status: String,
    /// Serialized gateway-response blob; may legitimately fail to parse as
    /// JSON, which means "no additional gateway detail".
    #[serde(default)]
    pub gateway_response: Option<String>,
}

/// `POST /v2/payments/{id}/finalize` response data (body is message-only).
#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeData {}

/// `POST /v2/refund/initiate` request body.
#[derive(Debug, Clone, Serialize)]
pub struct RefundRequest {
    pub reference: String,
    pub reason: String,
    pub amount: Decimal,
}

/// `POST /v2/refund/initiate` response data.
#[derive(Debug, Clone, Deserialize)]
pub struct RefundData {
    #[serde(default)]
    pub reference: Option<String>,
}
