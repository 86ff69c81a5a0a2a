//! Core domain types for the payrail gateway integration.
//!
//! Holds the payment model shared by every other crate:
//! - Payment, card instrument, customer and billing types
//! - Status mapping from gateway status strings
//! - Minor-unit to major-unit amount conversion
//! - ISO country code mapping for billing fields

pub mod country;
pub mod error;
pub mod money;
pub mod payment;

pub use country::to_alpha3;
pub use error::{CoreError, CoreResult};
pub use money::major_units;
pub use payment::{
    mask_pan, BillingAddress, CardInstrument, Customer, DeviceInformation, Payment, PaymentStatus,
    ThreeDsChallenge,
};
