//! Payment domain model.
//!
//! A `Payment` is constructed by the caller, enriched by the orchestrator at
//! each lifecycle step, and never persisted here. Card data only ever leaves
//! this process masked or inside the encryption envelope.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Internal payment status, mapped from the gateway's status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Success,
    Failed,
    /// Anything the gateway reports that is neither settled nor failed.
    #[default]
    Pending,
}

impl PaymentStatus {
    /// Map a gateway status string to the internal status.
    ///
    /// `success`/`completed` settle, `failed`/`error` fail, everything else
    /// (including unknown vocabulary) stays pending. Case-insensitive.
    pub fn from_gateway(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "success" | "completed" => Self::Success,
            "failed" | "error" => Self::Failed,
            _ => Self::Pending,
        }
    }

    /// Stable label for telemetry and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Pending => "PENDING",
        }
    }

    /// Whether this status counts as a successful routing outcome.
    ///
    /// Pending counts: the subaccount accepted the transaction even if it has
    /// not settled yet.
    pub fn is_routing_success(&self) -> bool {
        !matches!(self, Self::Failed)
    }
}

/// Card payment instrument.
///
/// Plaintext fields are present before initialize; after initialize they are
/// replaced by the encrypted residue carried in `encrypted`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CardInstrument {
    pub pan: Option<String>,
    pub expiry_month: Option<u8>,
    pub expiry_year: Option<u16>,
    pub cvv: Option<String>,
    /// Encrypted envelope produced at initialize, consumed at authorize.
    pub encrypted: Option<String>,
}

impl CardInstrument {
    /// Validate that the instrument can be sent to the gateway's initialize
    /// endpoint. Runs before any network call.
    pub fn validate_for_initialize(&self) -> CoreResult<()> {
        let pan = self
            .pan
            .as_deref()
            .ok_or_else(|| CoreError::InvalidCard("card number is required".into()))?;
        if pan.is_empty() || !pan.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::InvalidCard("card number must be numeric".into()));
        }
        match self.expiry_month {
            Some(m) if (1..=12).contains(&m) => {}
            Some(m) => {
                return Err(CoreError::InvalidCard(format!("invalid expiry month: {m}")));
            }
            None => return Err(CoreError::InvalidCard("expiry month is required".into())),
        }
        if self.expiry_year.is_none() {
            return Err(CoreError::InvalidCard("expiry year is required".into()));
        }
        if self.cvv.as_deref().map_or(true, str::is_empty) {
            return Err(CoreError::InvalidCard("cvv is required".into()));
        }
        Ok(())
    }

    /// Drop the plaintext card fields, keeping only the encrypted residue.
    pub fn scrub_plaintext(&mut self) {
        self.pan = None;
        self.cvv = None;
    }
}

impl std::fmt::Debug for CardInstrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardInstrument")
            .field("pan", &self.pan.as_deref().map(mask_pan))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &self.cvv.as_deref().map(|_| "***"))
            .field("has_encrypted", &self.encrypted.is_some())
            .finish()
    }
}

/// Mask a PAN for log output: first 6 and last 4 digits visible.
///
/// Anything that is not a plain ASCII digit string has not been validated
/// yet and is masked in full.
pub fn mask_pan(pan: &str) -> String {
    if !pan.is_ascii() || pan.len() <= 10 {
        return "*".repeat(pan.chars().count());
    }
    let (bin, rest) = pan.split_at(6);
    let (masked, last4) = rest.split_at(rest.len() - 4);
    format!("{bin}{}{last4}", "*".repeat(masked.len()))
}

/// Customer identity attached to a payment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Customer {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Billing address as supplied by the caller (alpha-2 country code).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingAddress {
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    /// ISO 3166-1 alpha-2 code, normalized to alpha-3 for the gateway.
    pub country: String,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Device fingerprint supplied by an external collaborator.
///
/// This core only consumes the value; it never queries a runtime environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceInformation {
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub screen_resolution: Option<String>,
}

/// The 3-D-Secure challenge descriptor surfaced from authorize.
///
/// Rendered by an external UI collaborator; never executed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeDsChallenge {
    pub acs_url: String,
    pub challenge_token: String,
}

/// An abstract payment request, enriched by the orchestrator at each step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payment {
    /// Amount in integer minor units (e.g. cents).
    pub amount_minor: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Caller-supplied reference; generated at initialize when absent.
    #[serde(default)]
    pub reference: Option<String>,
    pub customer: Customer,
    pub billing: BillingAddress,
    pub card: CardInstrument,
    #[serde(default)]
    pub device: DeviceInformation,
    #[serde(default)]
    pub client_ip: Option<String>,
    /// Gateway transaction id, assigned after initialize.
    #[serde(default)]
    pub provider_reference: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
    /// Human message from the last gateway interaction.
    #[serde(default)]
    pub message: Option<String>,
    /// Present when authorize returned a 3DS challenge.
    #[serde(default)]
    pub three_ds: Option<ThreeDsChallenge>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_card() -> CardInstrument {
        CardInstrument {
            pan: Some("4111111111111111".into()),
            expiry_month: Some(12),
            expiry_year: Some(2030),
            cvv: Some("123".into()),
            encrypted: None,
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(PaymentStatus::from_gateway("success"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_gateway("Completed"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_gateway("FAILED"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_gateway("error"), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from_gateway("processing"), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from_gateway(""), PaymentStatus::Pending);
    }

    #[test]
    fn test_pending_counts_as_routing_success() {
        assert!(PaymentStatus::Pending.is_routing_success());
        assert!(PaymentStatus::Success.is_routing_success());
        assert!(!PaymentStatus::Failed.is_routing_success());
    }

    #[test]
    fn test_card_validation_accepts_complete_card() {
        assert!(valid_card().validate_for_initialize().is_ok());
    }

    #[test]
    fn test_card_validation_rejects_missing_pan() {
        let card = CardInstrument {
            pan: None,
            ..valid_card()
        };
        assert!(card.validate_for_initialize().is_err());
    }

    #[test]
    fn test_card_validation_rejects_bad_month() {
        let card = CardInstrument {
            expiry_month: Some(13),
            ..valid_card()
        };
        assert!(card.validate_for_initialize().is_err());
    }

    #[test]
    fn test_card_validation_rejects_non_numeric_pan() {
        let card = CardInstrument {
            pan: Some("4111-1111".into()),
            ..valid_card()
        };
        assert!(card.validate_for_initialize().is_err());
    }

    #[test]
    fn test_mask_pan() {
        assert_eq!(mask_pan("4111111111111111"), "411111******1111");
        assert_eq!(mask_pan("12345"), "*****");
    }

    #[test]
    fn test_mask_pan_non_ascii_fully_masked() {
        // Fullwidth digits: 16 chars, 48 bytes. Debug can hit this before
        // validation rejects it.
        let fullwidth = "４１１１１１１１１１１１１１１１";
        assert_eq!(mask_pan(fullwidth), "*".repeat(16));

        let card = CardInstrument {
            pan: Some(fullwidth.into()),
            ..valid_card()
        };
        assert!(!format!("{card:?}").contains('４'));
    }

    #[test]
    fn test_debug_never_prints_pan() {
        let card = valid_card();
        let rendered = format!("{card:?}");
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("123\""));
        assert!(rendered.contains("411111******1111"));
    }

    #[test]
    fn test_scrub_plaintext() {
        let mut card = valid_card();
        card.encrypted = Some("blob".into());
        card.scrub_plaintext();
        assert!(card.pan.is_none());
        assert!(card.cvv.is_none());
        assert_eq!(card.encrypted.as_deref(), Some("blob"));
    }
}
