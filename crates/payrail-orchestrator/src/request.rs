//! Gateway request construction.
//!
//! Normalizes the caller-facing `Payment` into the gateway's wire shape:
//! decimal major units, alpha-3 billing country, callback URL, device
//! fields from request context.

use rust_decimal::Decimal;

use payrail_core::{to_alpha3, Payment};
use payrail_gateway::{
    BillingPayload, CardPayload, ChargeRequest, CustomerPayload, DevicePayload, InitializeRequest,
    RefundRequest,
};

/// Callback URL the gateway will hit for a payment reference.
pub fn callback_url(callback_base_url: &str, reference: &str) -> String {
    format!(
        "{}/payments/callback/{reference}",
        callback_base_url.trim_end_matches('/')
    )
}

/// Build the initialize request.
///
/// Caller has already validated the card instrument, so the plaintext
/// fields are present.
pub fn build_initialize_request(
    payment: &Payment,
    reference: &str,
    subaccount_id: &str,
    amount: Decimal,
    callback_base_url: &str,
) -> InitializeRequest {
    InitializeRequest {
        amount,
        currency: payment.currency.to_ascii_uppercase(),
        reference: reference.to_string(),
        customer: CustomerPayload {
            email: payment.customer.email.clone(),
            name: payment.customer.name.clone(),
            phone: payment.customer.phone.clone(),
        },
        subaccount_id: subaccount_id.to_string(),
        callback_url: callback_url(callback_base_url, reference),
        device_information: DevicePayload {
            fingerprint: payment.device.fingerprint.clone(),
            user_agent: payment.device.user_agent.clone(),
            language: payment.device.language.clone(),
            screen_resolution: payment.device.screen_resolution.clone(),
            ip_address: payment.client_ip.clone(),
        },
        billing_information: BillingPayload {
            address: payment.billing.address.clone(),
            city: payment.billing.city.clone(),
            state: payment.billing.state.clone(),
            country: to_alpha3(&payment.billing.country),
            postal_code: payment.billing.postal_code.clone(),
        },
        card: CardPayload {
            number: payment.card.pan.clone().unwrap_or_default(),
            expiry_month: payment.card.expiry_month.unwrap_or_default(),
            expiry_year: payment.card.expiry_year.unwrap_or_default(),
            cvv: payment.card.cvv.clone().unwrap_or_default(),
        },
    }
}

/// Build the charge request from the decrypted envelope residue.
pub fn build_charge_request(
    payment: &Payment,
    transaction_id: &str,
    subaccount_id: &str,
    amount: Decimal,
) -> ChargeRequest {
    ChargeRequest {
        transaction_id: transaction_id.to_string(),
        amount,
        currency: payment.currency.to_ascii_uppercase(),
        subaccount_id: subaccount_id.to_string(),
    }
}

/// Build the refund request.
pub fn build_refund_request(reference: &str, reason: &str, amount: Decimal) -> RefundRequest {
    RefundRequest {
        reference: reference.to_string(),
        reason: reason.to_string(),
        amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payrail_core::{BillingAddress, CardInstrument, Customer, DeviceInformation};
    use rust_decimal_macros::dec;

    fn payment() -> Payment {
        Payment {
            amount_minor: 1000,
            currency: "usd".into(),
            reference: None,
            customer: Customer {
                email: "jo@example.com".into(),
                name: "Jo Doe".into(),
                phone: Some("+15550100".into()),
            },
            billing: BillingAddress {
                address: "1 Main St".into(),
                city: "Springfield".into(),
                state: Some("IL".into()),
                country: "US".into(),
                postal_code: Some("62704".into()),
            },
            card: CardInstrument {
                pan: Some("4111111111111111".into()),
                expiry_month: Some(12),
                expiry_year: Some(2030),
                cvv: Some("123".into()),
                encrypted: None,
            },
            device: DeviceInformation {
                fingerprint: Some("fp-1".into()),
                ..DeviceInformation::default()
            },
            client_ip: Some("203.0.113.7".into()),
            ..Payment::default()
        }
    }

    #[test]
    fn test_initialize_request_normalization() {
        let request = build_initialize_request(
            &payment(),
            "ref-1",
            "sub-a",
            dec!(10.00),
            "https://shop.example.com/",
        );
        assert_eq!(request.amount, dec!(10.00));
        assert_eq!(request.currency, "USD");
        assert_eq!(request.billing_information.country, "USA");
        assert_eq!(
            request.callback_url,
            "https://shop.example.com/payments/callback/ref-1"
        );
        assert_eq!(request.device_information.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(request.card.number, "4111111111111111");
    }

    #[test]
    fn test_callback_url_no_double_slash() {
        assert_eq!(
            callback_url("https://a.example.com", "r"),
            "https://a.example.com/payments/callback/r"
        );
        assert_eq!(
            callback_url("https://a.example.com/", "r"),
            "https://a.example.com/payments/callback/r"
        );
    }
}
