//! Symmetric encryption using AES-256-GCM
//!
//! Ciphertext objects use the layout `iv (12 bytes) ‖ ciphertext ‖ tag (16 bytes)`,
//! with the tag appended per the GCM convention.

use crate::{
    keys::{AesKey, NONCE_SIZE},
    CryptoError, Result, TAG_SIZE,
};
use aes_gcm::{aead::Aead as AeadTrait, Aes256Gcm, KeyInit};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// A nonce (IV) for AES-GCM
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce {
    bytes: [u8; NONCE_SIZE],
}

impl Nonce {
    /// Generate a random nonce
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut bytes);
        Self { bytes }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != NONCE_SIZE {
            return Err(CryptoError::InvalidNonce(format!(
                "nonce must be {} bytes, got {}",
                NONCE_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; NONCE_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Get the nonce bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.bytes
    }
}

/// AES-256-GCM bound to one key
pub struct Aead {
    cipher: Aes256Gcm,
}

impl Aead {
    /// Create a new AEAD instance for the given key
    pub fn new(key: &AesKey) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { cipher })
    }

    /// Encrypt data with the given nonce, returning `ciphertext ‖ tag`
    pub fn encrypt(&self, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        let nonce_arr = aes_gcm::Nonce::from_slice(nonce.as_bytes());
        self.cipher
            .encrypt(nonce_arr, plaintext)
            .map_err(|e| CryptoError::Encryption(e.to_string()))
    }

    /// Decrypt `ciphertext ‖ tag`; a tag mismatch yields `CryptoError::Authentication`
    pub fn decrypt(&self, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let nonce_arr = aes_gcm::Nonce::from_slice(nonce.as_bytes());
        self.cipher
            .decrypt(nonce_arr, ciphertext)
            .map_err(|_| CryptoError::Authentication)
    }
}

/// Encrypt data with a generated nonce, returning the nonce and `ciphertext ‖ tag` separately
pub fn encrypt(key: &AesKey, plaintext: &[u8]) -> Result<(Nonce, Vec<u8>)> {
    let nonce = Nonce::generate();
    let ciphertext = Aead::new(key)?.encrypt(&nonce, plaintext)?;
    Ok((nonce, ciphertext))
}

/// Decrypt data produced by [`encrypt`]
pub fn decrypt(key: &AesKey, nonce: &Nonce, ciphertext: &[u8]) -> Result<Vec<u8>> {
    Aead::new(key)?.decrypt(nonce, ciphertext)
}

/// Encrypt a file into a self-contained ciphertext object: `iv ‖ ciphertext ‖ tag`
///
/// A fresh random IV is drawn on every call, so encrypting the same bytes twice
/// produces different objects (and therefore different content addresses).
pub fn encrypt_file(plaintext: &[u8], key: &AesKey) -> Result<Vec<u8>> {
    let (nonce, ciphertext) = encrypt(key, plaintext)?;
    let mut object = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    object.extend_from_slice(nonce.as_bytes());
    object.extend_from_slice(&ciphertext);
    Ok(object)
}

/// Decrypt a ciphertext object produced by [`encrypt_file`]
pub fn decrypt_file(object: &[u8], key: &AesKey) -> Result<Vec<u8>> {
    if object.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::InvalidCiphertext(format!(
            "ciphertext object must be at least {} bytes, got {}",
            NONCE_SIZE + TAG_SIZE,
            object.len()
        )));
    }
    let (iv, ciphertext) = object.split_at(NONCE_SIZE);
    let nonce = Nonce::from_bytes(iv)?;
    decrypt(key, &nonce, ciphertext)
}
