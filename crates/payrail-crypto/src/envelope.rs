//! Envelope payload carried between initialize and authorize.

use serde::{Deserialize, Serialize};

use crate::codec::EncryptionCodec;
use crate::error::CryptoResult;

/// Sensitive residue sealed into the envelope at initialize time.
///
/// Carries the card fields plus the routing decision so that authorize can
/// settle the outcome against the same subaccount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopePayload {
    pub card_number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cvv: String,
    pub subaccount_id: String,
}

impl EnvelopePayload {
    /// Seal this payload into an opaque base64 envelope.
    pub fn seal(&self, codec: &EncryptionCodec) -> CryptoResult<String> {
        let json = serde_json::to_string(self)?;
        Ok(codec.encrypt(&json))
    }

    /// Open an envelope produced by `seal` with the same codec.
    pub fn open(codec: &EncryptionCodec, envelope: &str) -> CryptoResult<Self> {
        let json = codec.decrypt(envelope)?;
        Ok(serde_json::from_str(&json)?)
    }
}
