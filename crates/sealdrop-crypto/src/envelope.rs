//! Envelope encryption: wrapping per-file AES keys under RSA-OAEP public keys
//!
//! A wrapped key is published as a [`WrappedKeyBlob`], a UTF-8 JSON object
//! carrying exactly one field, `encrypted_aes_key`, holding the standard
//! base64 encoding of the RSA-OAEP ciphertext.

use crate::{
    keys::{public_key_from_pem, AesKey, RsaPrivateKey, RsaPublicKey, KEY_SIZE},
    CryptoError, Result,
};
use base64::Engine;
use rand::rngs::OsRng;
use rsa::{traits::PublicKeyParts, Oaep};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// Length of the SHA-256 digest used by OAEP
const OAEP_HASH_LEN: usize = 32;

/// Largest message that can be OAEP-wrapped under a modulus of `modulus_bytes`
pub fn max_wrappable_len(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(2 * OAEP_HASH_LEN + 2)
}

/// Wrap a raw AES key under the recipient's public key (RSA-OAEP, SHA-256)
pub fn wrap_key(key: &AesKey, recipient: &RsaPublicKey) -> Result<Vec<u8>> {
    let limit = max_wrappable_len(recipient.size());
    if KEY_SIZE > limit {
        return Err(CryptoError::InvalidKey(format!(
            "modulus too small to wrap a {}-byte key (limit {} bytes)",
            KEY_SIZE, limit
        )));
    }
    recipient
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), key.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Wrap a raw AES key under a PEM-encoded recipient public key
pub fn wrap_key_for_pem(key: &AesKey, recipient_pem: &str) -> Result<Vec<u8>> {
    let recipient = public_key_from_pem(recipient_pem)?;
    wrap_key(key, &recipient)
}

/// Unwrap an AES key; fails with `CryptoError::Unwrap` when the private key
/// does not match the wrapping public key
pub fn unwrap_key(wrapped: &[u8], private_key: &RsaPrivateKey) -> Result<AesKey> {
    let raw = zeroize::Zeroizing::new(
        private_key
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| CryptoError::Unwrap)?,
    );
    AesKey::from_bytes(&raw)
}

/// Canonical wire form of a wrapped AES key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WrappedKeyBlob {
    /// Base64 (standard alphabet) of the RSA-OAEP ciphertext
    pub encrypted_aes_key: String,
}

impl WrappedKeyBlob {
    /// Build a blob around raw wrapped bytes
    pub fn new(wrapped: &[u8]) -> Self {
        Self {
            encrypted_aes_key: base64::engine::general_purpose::STANDARD.encode(wrapped),
        }
    }

    /// Wrap `key` for `recipient` and package the result
    pub fn seal(key: &AesKey, recipient: &RsaPublicKey) -> Result<Self> {
        Ok(Self::new(&wrap_key(key, recipient)?))
    }

    /// Decode the wrapped bytes
    pub fn wrapped_bytes(&self) -> Result<Vec<u8>> {
        Ok(base64::engine::general_purpose::STANDARD.decode(&self.encrypted_aes_key)?)
    }

    /// Unwrap the carried key with the recipient's private key
    pub fn open(&self, private_key: &RsaPrivateKey) -> Result<AesKey> {
        unwrap_key(&self.wrapped_bytes()?, private_key)
    }

    /// Serialize to the published JSON bytes
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse published JSON bytes; blobs missing `encrypted_aes_key` or
    /// carrying any other field are rejected
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let blob: Self = serde_json::from_slice(bytes)?;
        blob.wrapped_bytes()?;
        Ok(blob)
    }
}
