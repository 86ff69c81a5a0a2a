//! Crypto error types.

use thiserror::Error;

/// Errors produced by the envelope codec.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Wrong key/IV, truncated or corrupt ciphertext.
    #[error("decryption failure: ciphertext does not match key material")]
    Decrypt,

    #[error("decrypted payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("envelope payload error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
