//! AES-256-CBC envelope codec.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{CryptoError, CryptoResult};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const KEY_LENGTH: usize = 32;
const BLOCK_LENGTH: usize = 16;
const IV_FILLER: u8 = 0x00;

/// Stateless symmetric codec for the card-data envelope.
///
/// Operator-supplied key material of any length is accepted: the key is the
/// SHA-256 digest of the material (exactly the cipher's 32-byte key size),
/// and the IV is right-padded/truncated to the 16-byte block size. Safe to
/// share across concurrent calls.
#[derive(Clone)]
pub struct EncryptionCodec {
    key: Zeroizing<[u8; KEY_LENGTH]>,
    iv: [u8; BLOCK_LENGTH],
}

impl EncryptionCodec {
    /// Build a codec from arbitrary-length key and IV material.
    pub fn new(key_material: &str, iv_material: &str) -> Self {
        let digest = Sha256::digest(key_material.as_bytes());
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&digest);

        let mut iv = [IV_FILLER; BLOCK_LENGTH];
        let src = iv_material.as_bytes();
        let take = src.len().min(BLOCK_LENGTH);
        iv[..take].copy_from_slice(&src[..take]);

        Self {
            key: Zeroizing::new(key),
            iv,
        }
    }

    /// Encrypt a UTF-8 plaintext into a base64 envelope.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let cipher = Aes256CbcEnc::new((&*self.key).into(), &self.iv.into());
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        BASE64_STANDARD.encode(ciphertext)
    }

    /// Decrypt a base64 envelope produced by a matching `encrypt` call.
    ///
    /// Fails with a `CryptoError` on malformed input, wrong key/IV, or
    /// truncated data.
    pub fn decrypt(&self, envelope: &str) -> CryptoResult<String> {
        let ciphertext = BASE64_STANDARD.decode(envelope.trim())?;
        let cipher = Aes256CbcDec::new((&*self.key).into(), &self.iv.into());
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CryptoError::Decrypt)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

impl std::fmt::Debug for EncryptionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionCodec")
            .field("key", &"***redacted***")
            .finish()
    }
}
