//! Symmetric envelope codec for in-transit card data.
//!
//! Card fields and the chosen subaccount id are sealed into an opaque
//! base64 envelope between the initialize and authorize steps. AES-256-CBC
//! with PKCS7 padding; key material of arbitrary length is derived down to
//! the cipher's fixed sizes. Nothing here stores card data at rest.

pub mod codec;
pub mod envelope;
pub mod error;

pub use codec::EncryptionCodec;
pub use envelope::EnvelopePayload;
pub use error::{CryptoError, CryptoResult};
