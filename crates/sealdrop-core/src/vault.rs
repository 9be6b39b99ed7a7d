//! KeyVault: the private-key lifecycle of local identities
//!
//! Each identity has at most one password-locked private key in the
//! [`SecureStore`]. Unlocking never reveals whether the blob was missing or
//! the password was wrong; both surface as [`CoreError::BadCredential`].

use crate::{address::Identity, secure_store::SecureStore, CoreError, Result};
use sealdrop_crypto::{
    keys::{private_key_from_pem, private_key_to_pem},
    password::{derive_password_key, SALT_SIZE},
    EncryptedPrivateKey, RsaKeyPair, RsaPrivateKey,
};
use tracing::{debug, info, instrument};
use zeroize::Zeroizing;

const STORAGE_PREFIX: &str = "rsa-private-key";

const DUMMY_SALT: [u8; SALT_SIZE] = [0u8; SALT_SIZE];

/// Run KDF and key-decoding work on the blocking pool
async fn offload<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CoreError::Storage(format!("key task failed: {}", e)))?
}

/// Generate a fresh RSA-OAEP key pair
///
/// CPU bound; async callers should run it on a blocking thread.
pub fn generate_keypair(bits: usize) -> Result<RsaKeyPair> {
    Ok(RsaKeyPair::generate(bits)?)
}

/// Encrypt a private key under a password with fresh salt and IV
pub async fn lock_private_key(private_key: &RsaPrivateKey, password: &str) -> Result<EncryptedPrivateKey> {
    let private_key = private_key.clone();
    let password = Zeroizing::new(password.to_owned());
    offload(move || Ok(EncryptedPrivateKey::lock(&private_key, &password)?)).await
}

/// Decrypt a locked private key
///
/// Failures keep their crypto cause; [`KeyVault::unlock`] folds them into
/// `BadCredential`.
pub async fn unlock_private_key(blob: &EncryptedPrivateKey, password: &str) -> Result<RsaPrivateKey> {
    let blob = blob.clone();
    let password = Zeroizing::new(password.to_owned());
    offload(move || Ok(blob.unlock(&password)?)).await
}

// A refusal without a stored blob still pays for one derivation.
async fn refuse(password: &str) -> Result<RsaPrivateKey> {
    let password = Zeroizing::new(password.to_owned());
    offload(move || {
        let _key = derive_password_key(&password, &DUMMY_SALT);
        Ok(())
    })
    .await?;
    debug!("unlock refused");
    Err(CoreError::BadCredential)
}

/// Password-protected private key storage
pub struct KeyVault<S> {
    store: S,
}

impl<S: SecureStore> KeyVault<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn storage_key(identity: &Identity) -> String {
        format!("{}-{}", STORAGE_PREFIX, identity)
    }

    /// Store the locked key of `identity`
    ///
    /// Refuses with `AlreadyExists` when a blob is present, unless
    /// `overwrite` is set.
    #[instrument(skip(self, blob))]
    pub async fn persist(&self, identity: &Identity, blob: &EncryptedPrivateKey, overwrite: bool) -> Result<()> {
        if !overwrite && self.exists(identity).await? {
            return Err(CoreError::AlreadyExists(format!(
                "a private key is already stored for {}",
                identity
            )));
        }
        self.store.put(&Self::storage_key(identity), &blob.to_bytes()?).await?;
        debug!("persisted locked private key");
        Ok(())
    }

    pub async fn exists(&self, identity: &Identity) -> Result<bool> {
        Ok(self.store.get(&Self::storage_key(identity)).await?.is_some())
    }

    /// Load the locked blob without decrypting it
    pub async fn load(&self, identity: &Identity) -> Result<Option<EncryptedPrivateKey>> {
        match self.store.get(&Self::storage_key(identity)).await? {
            Some(bytes) => Ok(Some(EncryptedPrivateKey::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Decrypt the private key of `identity`
    #[instrument(skip(self, password))]
    pub async fn unlock(&self, identity: &Identity, password: &str) -> Result<RsaPrivateKey> {
        let blob = match self.load(identity).await {
            Ok(Some(blob)) => blob,
            Ok(None) | Err(CoreError::Crypto(_)) | Err(CoreError::Serialization(_)) => {
                return refuse(password).await
            }
            Err(e) => return Err(e),
        };
        match unlock_private_key(&blob, password).await {
            Ok(key) => Ok(key),
            Err(CoreError::Crypto(_)) => {
                debug!("unlock refused");
                Err(CoreError::BadCredential)
            }
            Err(e) => Err(e),
        }
    }

    /// Lock `private_key` under `password` and store it
    pub async fn lock_and_persist(
        &self,
        identity: &Identity,
        private_key: &RsaPrivateKey,
        password: &str,
        overwrite: bool,
    ) -> Result<()> {
        let blob = lock_private_key(private_key, password).await?;
        self.persist(identity, &blob, overwrite).await
    }

    /// Forget the stored key of `identity`
    #[instrument(skip(self))]
    pub async fn clear(&self, identity: &Identity) -> Result<()> {
        self.store.delete(&Self::storage_key(identity)).await?;
        info!("cleared stored private key");
        Ok(())
    }

    /// Produce a downloadable `ENCRYPTED RSA PRIVATE KEY` backup
    ///
    /// The key is unlocked and re-locked under the same password, so the
    /// backup carries its own salt and IV.
    pub async fn export_encrypted_pem(&self, identity: &Identity, password: &str) -> Result<String> {
        let private_key = self.unlock(identity, password).await?;
        Ok(lock_private_key(&private_key, password).await?.to_pem()?)
    }

    /// Install a backup produced by [`export_encrypted_pem`](Self::export_encrypted_pem)
    ///
    /// Only the structure is checked; the password is needed later to unlock.
    #[instrument(skip(self, pem))]
    pub async fn import_encrypted_pem(&self, identity: &Identity, pem: &str, overwrite: bool) -> Result<()> {
        let blob = EncryptedPrivateKey::from_pem(pem)?;
        self.persist(identity, &blob, overwrite).await
    }

    /// Export the unlocked key as plain PKCS#8 PEM
    pub async fn export_private_key_pem(&self, identity: &Identity, password: &str) -> Result<Zeroizing<String>> {
        let private_key = self.unlock(identity, password).await?;
        Ok(private_key_to_pem(&private_key)?)
    }

    /// Lock and store a plain PKCS#8 PEM private key
    pub async fn import_private_key_pem(
        &self,
        identity: &Identity,
        pem: &str,
        password: &str,
        overwrite: bool,
    ) -> Result<RsaKeyPair> {
        let pem = Zeroizing::new(pem.to_owned());
        let private_key = offload(move || Ok(private_key_from_pem(&pem)?)).await?;
        self.lock_and_persist(identity, &private_key, password, overwrite).await?;
        Ok(RsaKeyPair::from_private_key(private_key))
    }
}
