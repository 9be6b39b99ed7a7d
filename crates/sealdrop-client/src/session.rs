//! Session: the explicitly constructed context every operation runs in
//!
//! A session binds one identity to its adapter handles and owns the
//! (optional) cache of the unlocked private key. It is created at login and
//! dropped at logout; dropping it drops the cached key, which zeroizes
//! itself.

use crate::{
    password::{PasswordProvider, NEW_PASSWORD_PROMPT, UNLOCK_PROMPT},
    ClientError, Config, Result,
};
use parking_lot::Mutex;
use sealdrop_blockstore::{BlobStore, MemoryBlockStore};
use sealdrop_core::{
    generate_keypair, unlock_private_key, CoreError, Identity, KeyVault, Ledger, MemoryLedger,
    MemorySecureStore, MetadataLedger, PublicKeyRecord, SecureStore,
};
use sealdrop_crypto::{
    keys::public_key_from_pem, CryptoError, EncryptedPrivateKey, RsaPrivateKey, RsaPublicKey,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};
use zeroize::Zeroizing;

/// Adapter handles shared by every session on a device
#[derive(Clone)]
pub struct Backends {
    pub blobs: Arc<dyn BlobStore>,
    pub ledger: Arc<dyn Ledger>,
    pub secure_store: Arc<dyn SecureStore>,
}

impl Backends {
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        ledger: Arc<dyn Ledger>,
        secure_store: Arc<dyn SecureStore>,
    ) -> Self {
        Self {
            blobs,
            ledger,
            secure_store,
        }
    }

    /// Everything in process memory
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBlockStore::new()),
            Arc::new(MemoryLedger::new()),
            Arc::new(MemorySecureStore::new()),
        )
    }
}

struct CachedKey {
    key: RsaPrivateKey,
    expires_at: Instant,
}

/// An identity's working context
pub struct Session {
    identity: Identity,
    config: Config,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) ledger: MetadataLedger<Arc<dyn Ledger>>,
    vault: KeyVault<Arc<dyn SecureStore>>,
    passwords: Arc<dyn PasswordProvider>,
    cached_key: Mutex<Option<CachedKey>>,
}

impl Session {
    pub fn new(
        identity: Identity,
        backends: Backends,
        passwords: Arc<dyn PasswordProvider>,
        config: Config,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            identity,
            config,
            blobs: backends.blobs,
            ledger: MetadataLedger::new(backends.ledger),
            vault: KeyVault::new(backends.secure_store),
            passwords,
            cached_key: Mutex::new(None),
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Typed ledger access
    pub fn ledger(&self) -> &MetadataLedger<Arc<dyn Ledger>> {
        &self.ledger
    }

    /// Local key storage
    pub fn vault(&self) -> &KeyVault<Arc<dyn SecureStore>> {
        &self.vault
    }

    /// Drop the cached private key, if any
    pub fn lock(&self) {
        if self.cached_key.lock().take().is_some() {
            debug!(identity = %self.identity, "session key cache cleared");
        }
    }

    /// Whether an unlocked key is currently cached
    pub fn is_unlocked(&self) -> bool {
        self.cached_key
            .lock()
            .as_ref()
            .is_some_and(|cached| cached.expires_at > Instant::now())
    }

    pub(crate) async fn request_password(&self, prompt: &str) -> Result<Zeroizing<String>> {
        self.passwords.request(prompt).await.ok_or(ClientError::Cancelled)
    }

    /// Unlock this identity's private key, prompting unless a cached key is
    /// still fresh
    pub(crate) async fn private_key(&self) -> Result<RsaPrivateKey> {
        if let Some(ttl) = self.config.key_cache_ttl {
            let mut cached = self.cached_key.lock();
            match cached.as_ref() {
                Some(entry) if entry.expires_at > Instant::now() => return Ok(entry.key.clone()),
                Some(_) => {
                    *cached = None;
                    debug!(identity = %self.identity, "cached key expired after {:?}", ttl);
                }
                None => {}
            }
        }

        let password = self.request_password(UNLOCK_PROMPT).await?;
        let key = self.vault.unlock(&self.identity, &password).await?;

        if let Some(ttl) = self.config.key_cache_ttl {
            *self.cached_key.lock() = Some(CachedKey {
                key: key.clone(),
                expires_at: Instant::now() + ttl,
            });
        }
        Ok(key)
    }

    /// Look up and parse the registered public key of `identity`
    pub(crate) async fn public_key_of(&self, identity: &Identity) -> Result<RsaPublicKey> {
        let record = self.ledger.read_public_key_record(identity).await?;
        Ok(public_key_from_pem(&record.public_key_pem)?)
    }

    /// Create this identity's key pair and register its public key
    ///
    /// Refuses when a local key already exists (unless `overwrite`) and
    /// when the ledger already holds a public key for the identity.
    #[instrument(skip(self), fields(identity = %self.identity))]
    pub async fn register_identity(&self, overwrite: bool) -> Result<PublicKeyRecord> {
        if !overwrite && self.vault.exists(&self.identity).await? {
            return Err(CoreError::AlreadyExists(format!(
                "a private key is already stored for {}",
                self.identity
            ))
            .into());
        }
        match self.ledger.read_public_key_record(&self.identity).await {
            Ok(_) => {
                return Err(CoreError::AlreadyExists(format!(
                    "a public key is already registered for {}",
                    self.identity
                ))
                .into())
            }
            Err(CoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let bits = self.config.rsa_bits;
        let keypair = tokio::task::spawn_blocking(move || generate_keypair(bits))
            .await
            .map_err(|e| ClientError::Crypto(CryptoError::KeyGeneration(e.to_string())))??;
        debug!(bits, "generated key pair");

        let password = self.request_password(NEW_PASSWORD_PROMPT).await?;
        self.vault
            .lock_and_persist(&self.identity, keypair.private_key(), &password, overwrite)
            .await?;

        let record = PublicKeyRecord {
            owner: self.identity.clone(),
            public_key_pem: keypair.public_key_pem()?,
        };
        self.ledger.write_public_key_record(&record).await?;
        self.lock();
        info!("identity registered");
        Ok(record)
    }

    /// Download-ready encrypted backup of this identity's private key
    pub async fn export_private_key(&self) -> Result<String> {
        let password = self.request_password(UNLOCK_PROMPT).await?;
        Ok(self.vault.export_encrypted_pem(&self.identity, &password).await?)
    }

    /// Install an encrypted backup as this identity's local key
    ///
    /// The backup must unlock with the prompted password and match the
    /// registered public key, if one exists.
    #[instrument(skip(self, pem), fields(identity = %self.identity))]
    pub async fn import_private_key(&self, pem: &str, overwrite: bool) -> Result<()> {
        let blob = EncryptedPrivateKey::from_pem(pem)?;
        let password = self.request_password(UNLOCK_PROMPT).await?;
        let key = match unlock_private_key(&blob, &password).await {
            Ok(key) => key,
            Err(CoreError::Crypto(_)) => return Err(CoreError::BadCredential.into()),
            Err(e) => return Err(e.into()),
        };

        match self.public_key_of(&self.identity).await {
            Ok(registered) if registered != key.to_public_key() => {
                return Err(ClientError::Input(
                    "backup does not match the registered public key".to_string(),
                ))
            }
            Ok(_) | Err(ClientError::Core(CoreError::NotFound(_))) => {}
            Err(e) => return Err(e),
        }

        self.vault.persist(&self.identity, &blob, overwrite).await?;
        self.lock();
        info!("private key imported");
        Ok(())
    }

    /// Forget this identity's local key
    pub async fn clear_private_key(&self) -> Result<()> {
        self.lock();
        Ok(self.vault.clear(&self.identity).await?)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("config", &self.config)
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}
