//! # Sealdrop Crypto
//!
//! Envelope-encryption primitives for the Sealdrop storage system.
//!
//! This crate provides:
//! - **File cipher**: AES-256-GCM with a fresh 12-byte IV per object (`iv ‖ ciphertext ‖ tag`)
//! - **Key wrapping**: RSA-OAEP (SHA-256) wrapping of per-file AES keys
//! - **Wrapped key blobs**: the canonical `{ "encrypted_aes_key": <base64> }` wire format
//! - **Password lock**: PBKDF2-SHA256 derived AES key protecting the PKCS#8 private key at rest
//! - **Keccak-256**: hashing used for ledger address derivation
//!
//! ## Security Model
//!
//! - All encryption happens client-side
//! - Private keys never leave the device unencrypted
//! - The blob store and the ledger only ever see ciphertext and wrapped keys
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdrop_crypto::{AesKey, RsaKeyPair, envelope, symmetric};
//!
//! let recipient = RsaKeyPair::generate(2048)?;
//! let key = AesKey::generate();
//!
//! let ciphertext = symmetric::encrypt_file(b"Hello, World!", &key)?;
//! let wrapped = envelope::wrap_key(&key, recipient.public_key())?;
//!
//! let unwrapped = envelope::unwrap_key(&wrapped, recipient.private_key())?;
//! let plaintext = symmetric::decrypt_file(&ciphertext, &unwrapped)?;
//! ```

pub mod envelope;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod password;
pub mod symmetric;

pub use envelope::{unwrap_key, wrap_key, wrap_key_for_pem, WrappedKeyBlob};
pub use error::{CryptoError, Result};
pub use hashing::{keccak256, keccak256_concat, Keccak256Hash};
pub use keys::{AesKey, RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use password::{EncryptedPrivateKey, PBKDF2_ITERATIONS};
pub use symmetric::{decrypt_file, encrypt_file, Nonce};

/// Minimum accepted RSA modulus size in bits
pub const MIN_RSA_BITS: usize = 2048;

/// Size of the AES-GCM authentication tag appended to every ciphertext
pub const TAG_SIZE: usize = 16;
