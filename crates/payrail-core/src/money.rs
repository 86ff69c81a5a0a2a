//! Amount normalization.
//!
//! The caller supplies amounts in integer minor units; the gateway expects
//! decimal major units. The conversion is exact via `rust_decimal`.

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};

/// ISO 4217 currencies with no minor unit.
static ZERO_DECIMAL_CURRENCIES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["JPY", "KRW", "VND", "CLP", "XOF", "XAF"]);

/// Minor-unit exponent for a currency code (2 unless zero-decimal).
pub fn currency_exponent(currency: &str) -> u32 {
    let upper = currency.trim().to_ascii_uppercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&upper.as_str()) {
        0
    } else {
        2
    }
}

/// Convert an amount in integer minor units to decimal major units.
///
/// `major_units(1000, "USD")` is exactly `10.00`; `major_units(1000, "JPY")`
/// is `1000`.
pub fn major_units(amount_minor: i64, currency: &str) -> CoreResult<Decimal> {
    if amount_minor <= 0 {
        return Err(CoreError::InvalidAmount(format!(
            "amount must be positive, got {amount_minor}"
        )));
    }
    Ok(Decimal::new(amount_minor, currency_exponent(currency)))
}
