// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key vault lifecycle: create, unlock, lock, biometry, password change, reset.
//!
//! Slot layout in the secure store:
//! - `app_key`: random device-bound key, stored raw.
//! - `entropy`: vault entropy sealed under the app key.
//! - `encryption_reference`: device id sealed under the master key, then
//!   sealed again under the app key. Proves a candidate master key.
//! - `biometry_key`: random key released by the biometric authenticator.
//! - `master_key`: master key sealed under the biometry key.
//!
//! Each wrapped slot binds its own slot name as associated data, so a value
//! copied into a different slot fails to open. The master key itself lives
//! only in memory while unlocked and is dropped on [`KeyVault::lock`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strongbox_core::{
    BiometryAuthenticator, CipherError, DeviceId, KeySlot, SealedBox, SecureStore,
    StrongboxError, SymmetricKey, VaultId,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto;
use crate::kdf::{self, KdfSpec, MasterSecret};
use crate::keys::{self, MasterKey};
use crate::recovery::{self, Entropy, RecoveryWords};

/// Non-secret facts needed to unlock a vault. Persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultDescriptor {
    pub vault_id: VaultId,
    pub device_id: DeviceId,
    pub kdf_spec: KdfSpec,
}

impl VaultDescriptor {
    /// A descriptor for a brand new vault on this device.
    pub fn new(kdf_spec: KdfSpec) -> Self {
        Self {
            vault_id: VaultId::new_v4(),
            device_id: DeviceId::new_v4(),
            kdf_spec,
        }
    }
}

/// Owner of the vault's key material.
pub struct KeyVault {
    store: Arc<dyn SecureStore>,
    biometry: Arc<dyn BiometryAuthenticator>,
    session: RwLock<Option<MasterKey>>,
}

impl fmt::Debug for KeyVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyVault")
            .field("access_group", &self.store.access_group())
            .field("session", &"[REDACTED]")
            .finish()
    }
}

fn wrap(key: &SymmetricKey, slot: KeySlot, plaintext: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let sealed = crypto::seal(key, plaintext, slot.to_string().as_bytes())?;
    Ok(Zeroizing::new(sealed.into_bytes()))
}

fn unwrap(key: &SymmetricKey, slot: KeySlot, stored: &[u8]) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let sealed = SealedBox::from_bytes(stored.to_vec());
    crypto::open(key, &sealed, slot.to_string().as_bytes())
}

/// Fresh app key plus the entropy and encryption reference it wraps.
fn key_slots(
    entropy: &Entropy,
    master_key: &MasterKey,
    device_id: DeviceId,
) -> Result<Vec<(KeySlot, Zeroizing<Vec<u8>>)>, StrongboxError> {
    let app_key = crypto::random_key()?;
    let reference = keys::encryption_reference(master_key, device_id)?;
    Ok(vec![
        (KeySlot::AppKey, Zeroizing::new(app_key.expose().to_vec())),
        (
            KeySlot::Entropy,
            wrap(&app_key, KeySlot::Entropy, entropy.as_bytes())?,
        ),
        (
            KeySlot::EncryptionReference,
            wrap(&app_key, KeySlot::EncryptionReference, reference.as_bytes())?,
        ),
    ])
}

impl KeyVault {
    pub fn new(store: Arc<dyn SecureStore>, biometry: Arc<dyn BiometryAuthenticator>) -> Self {
        Self {
            store,
            biometry,
            session: RwLock::new(None),
        }
    }

    // --- scoped slot accessors ---

    pub async fn read(&self, slot: KeySlot) -> Result<Option<Zeroizing<Vec<u8>>>, StrongboxError> {
        self.store.read(slot).await
    }

    pub async fn save(&self, slot: KeySlot, value: &[u8]) -> Result<(), StrongboxError> {
        self.store.save(slot, value).await
    }

    pub async fn clear(&self, slot: KeySlot) -> Result<(), StrongboxError> {
        self.store.clear(slot).await
    }

    async fn require(&self, slot: KeySlot) -> Result<Zeroizing<Vec<u8>>, StrongboxError> {
        self.store
            .read(slot)
            .await?
            .ok_or_else(|| StrongboxError::Vault(format!("no {slot} stored on this device")))
    }

    async fn app_key(&self) -> Result<SymmetricKey, StrongboxError> {
        let raw = self.require(KeySlot::AppKey).await?;
        SymmetricKey::try_from_slice(&raw)
            .ok_or_else(|| StrongboxError::Vault("stored app key is corrupted".to_string()))
    }

    // --- lifecycle ---

    /// Whether a vault has been created or restored on this device.
    pub async fn exists(&self) -> Result<bool, StrongboxError> {
        Ok(self.store.read(KeySlot::Entropy).await?.is_some())
    }

    /// Create a vault with fresh entropy and unlock it.
    ///
    /// Returns the recovery words. This is the only time they are produced
    /// without an unlocked session.
    pub async fn create(
        &self,
        secret: MasterSecret,
        descriptor: &VaultDescriptor,
        entropy_bytes: usize,
    ) -> Result<RecoveryWords, StrongboxError> {
        if self.exists().await? {
            return Err(StrongboxError::Vault(
                "a vault already exists on this device".to_string(),
            ));
        }
        let entropy = Entropy::generate(entropy_bytes)?;
        let words = recovery::entropy_to_words(&entropy)?;
        let master_key =
            kdf::derive_in_background(secret, entropy.clone(), descriptor.kdf_spec).await?;

        let entries = key_slots(&entropy, &master_key, descriptor.device_id)?;
        self.store.save_all(entries).await?;
        *self.session.write().await = Some(master_key);
        info!(vault_id = %descriptor.vault_id, "vault created");
        Ok(words)
    }

    /// Rebuild a vault's key material on this device from its recovery words.
    ///
    /// Any slots already present are replaced in the same batch as the new
    /// ones, so a failed write leaves the previous vault intact.
    pub async fn restore<S: AsRef<str>>(
        &self,
        words: &[S],
        secret: MasterSecret,
        descriptor: &VaultDescriptor,
    ) -> Result<MasterKey, StrongboxError> {
        let entropy = recovery::words_to_entropy(words)?;
        let master_key =
            kdf::derive_in_background(secret, entropy.clone(), descriptor.kdf_spec).await?;

        let entries = key_slots(&entropy, &master_key, descriptor.device_id)?;
        self.store.replace_all(entries).await?;
        *self.session.write().await = Some(master_key.clone());
        info!(vault_id = %descriptor.vault_id, "vault restored from recovery words");
        Ok(master_key)
    }

    /// The vault entropy, unwrapped with the app key.
    pub async fn entropy(&self) -> Result<Entropy, StrongboxError> {
        let app_key = self.app_key().await?;
        let stored = self.require(KeySlot::Entropy).await?;
        let bytes = unwrap(&app_key, KeySlot::Entropy, &stored)?;
        Ok(Entropy::from_bytes(&bytes)?)
    }

    async fn check_reference(&self, master_key: &MasterKey) -> Result<(), StrongboxError> {
        let app_key = self.app_key().await?;
        let stored = self.require(KeySlot::EncryptionReference).await?;
        let reference = unwrap(&app_key, KeySlot::EncryptionReference, &stored)?;
        keys::verify_encryption_reference(master_key, &SealedBox::from_bytes(reference.to_vec()))?;
        Ok(())
    }

    /// Accept an already derived master key if it matches the stored reference.
    pub async fn unlock_with_key(&self, master_key: MasterKey) -> Result<(), StrongboxError> {
        if let Err(e) = self.check_reference(&master_key).await {
            warn!("unlock rejected: master key does not match encryption reference");
            return Err(e);
        }
        *self.session.write().await = Some(master_key);
        self.biometry.reset_failures().await;
        debug!("vault unlocked");
        Ok(())
    }

    /// Derive the master key from the password and unlock.
    pub async fn unlock_with_password(
        &self,
        secret: MasterSecret,
        descriptor: &VaultDescriptor,
    ) -> Result<MasterKey, StrongboxError> {
        let entropy = self.entropy().await?;
        let master_key = kdf::derive_in_background(secret, entropy, descriptor.kdf_spec).await?;
        self.unlock_with_key(master_key.clone()).await?;
        Ok(master_key)
    }

    /// Store a biometry-wrapped copy of the current master key.
    pub async fn enable_biometry(&self) -> Result<(), StrongboxError> {
        let master_key = self.master_key().await?;
        let biometry_key = crypto::random_key()?;
        let wrapped = wrap(&biometry_key, KeySlot::MasterKey, master_key.expose())?;

        self.store
            .save_all(vec![
                (
                    KeySlot::BiometryKey,
                    Zeroizing::new(biometry_key.expose().to_vec()),
                ),
                (KeySlot::MasterKey, wrapped),
            ])
            .await?;
        info!("biometric unlock enabled");
        Ok(())
    }

    /// Remove the biometry key and the master key it wraps.
    pub async fn disable_biometry(&self) -> Result<(), StrongboxError> {
        self.store.clear(KeySlot::MasterKey).await?;
        self.store.clear(KeySlot::BiometryKey).await?;
        info!("biometric unlock disabled");
        Ok(())
    }

    pub async fn is_biometry_enabled(&self) -> Result<bool, StrongboxError> {
        Ok(self.store.read(KeySlot::MasterKey).await?.is_some())
    }

    /// Unlock through the biometric authenticator.
    ///
    /// Every failure is recoverable by falling back to the password.
    pub async fn unlock_with_biometry(&self, reason: &str) -> Result<MasterKey, StrongboxError> {
        let biometry_key = self.biometry.unlock(reason).await?;
        let stored = self.require(KeySlot::MasterKey).await?;
        let raw = unwrap(&biometry_key, KeySlot::MasterKey, &stored)?;
        let master_key = SymmetricKey::try_from_slice(&raw)
            .map(MasterKey::new)
            .ok_or(CipherError::MalformedCiphertext)?;

        self.check_reference(&master_key).await?;
        *self.session.write().await = Some(master_key.clone());
        debug!("vault unlocked with biometry");
        Ok(master_key)
    }

    /// Drop the in-memory master key.
    pub async fn lock(&self) {
        if self.session.write().await.take().is_some() {
            debug!("vault locked");
        }
    }

    pub async fn is_unlocked(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// The session master key, or [`StrongboxError::Locked`].
    pub async fn master_key(&self) -> Result<MasterKey, StrongboxError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(StrongboxError::Locked)
    }

    /// Recovery words for the stored entropy. Requires an unlocked session.
    pub async fn recovery_words(&self) -> Result<RecoveryWords, StrongboxError> {
        self.master_key().await?;
        let entropy = self.entropy().await?;
        Ok(recovery::entropy_to_words(&entropy)?)
    }

    /// Change the master password, keeping the entropy and recovery words.
    ///
    /// Returns the new master key. Item keys change with it, so callers must
    /// re-seal stored items with [`crate::cipher::reencrypt`].
    pub async fn change_password(
        &self,
        new_secret: MasterSecret,
        descriptor: &VaultDescriptor,
    ) -> Result<MasterKey, StrongboxError> {
        self.master_key().await?;
        let entropy = self.entropy().await?;
        let new_key = kdf::derive_in_background(new_secret, entropy, descriptor.kdf_spec).await?;

        let app_key = self.app_key().await?;
        let reference = keys::encryption_reference(&new_key, descriptor.device_id)?;
        let mut entries = vec![(
            KeySlot::EncryptionReference,
            wrap(&app_key, KeySlot::EncryptionReference, reference.as_bytes())?,
        )];
        let biometry_key = self
            .store
            .read(KeySlot::BiometryKey)
            .await?
            .and_then(|raw| SymmetricKey::try_from_slice(&raw));
        if let Some(biometry_key) = biometry_key {
            entries.push((
                KeySlot::MasterKey,
                wrap(&biometry_key, KeySlot::MasterKey, new_key.expose())?,
            ));
        }
        self.store.save_all(entries).await?;

        *self.session.write().await = Some(new_key.clone());
        info!(vault_id = %descriptor.vault_id, "master password changed");
        Ok(new_key)
    }

    /// Irreversibly purge every key slot and the session.
    pub async fn reset_app(&self) -> Result<(), StrongboxError> {
        self.store.clear_all().await?;
        self.session.write().await.take();
        warn!(access_group = self.store.access_group(), "all key material purged");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use strongbox_core::BiometryError;
    use strongbox_storage::MemorySecureStore;

    /// Releases whatever is in the biometry slot, or reports not enrolled.
    struct StoreBiometry(Arc<dyn SecureStore>);

    #[async_trait]
    impl BiometryAuthenticator for StoreBiometry {
        async fn unlock(&self, _reason: &str) -> Result<SymmetricKey, BiometryError> {
            match self.0.read(KeySlot::BiometryKey).await {
                Ok(Some(raw)) => SymmetricKey::try_from_slice(&raw).ok_or(BiometryError::Unavailable),
                Ok(None) => Err(BiometryError::NotEnrolled),
                Err(_) => Err(BiometryError::Unavailable),
            }
        }

        async fn is_enrolled(&self) -> bool {
            matches!(self.0.read(KeySlot::BiometryKey).await, Ok(Some(_)))
        }
    }

    /// Memory store whose batch writes fail once `fail_writes` is set.
    struct FailingStore {
        inner: MemorySecureStore,
        fail_writes: AtomicBool,
    }

    impl FailingStore {
        fn check(&self) -> Result<(), StrongboxError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StrongboxError::Internal("disk full".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SecureStore for FailingStore {
        async fn read(&self, slot: KeySlot) -> Result<Option<Zeroizing<Vec<u8>>>, StrongboxError> {
            self.inner.read(slot).await
        }

        async fn save(&self, slot: KeySlot, value: &[u8]) -> Result<(), StrongboxError> {
            self.check()?;
            self.inner.save(slot, value).await
        }

        async fn clear(&self, slot: KeySlot) -> Result<(), StrongboxError> {
            self.inner.clear(slot).await
        }

        async fn save_all(
            &self,
            entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
        ) -> Result<(), StrongboxError> {
            self.check()?;
            self.inner.save_all(entries).await
        }

        async fn clear_all(&self) -> Result<(), StrongboxError> {
            self.inner.clear_all().await
        }

        async fn replace_all(
            &self,
            entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
        ) -> Result<(), StrongboxError> {
            self.check()?;
            self.inner.replace_all(entries).await
        }

        fn access_group(&self) -> &str {
            self.inner.access_group()
        }
    }

    fn fast_descriptor() -> VaultDescriptor {
        VaultDescriptor::new(KdfSpec {
            memory_mb: 8,
            iterations: 1,
            parallelism: 1,
            ..KdfSpec::default()
        })
    }

    fn vault_pair() -> (KeyVault, Arc<dyn SecureStore>) {
        let store: Arc<dyn SecureStore> = Arc::new(MemorySecureStore::new("group.test"));
        let biometry = Arc::new(StoreBiometry(store.clone()));
        (KeyVault::new(store.clone(), biometry), store)
    }

    #[tokio::test]
    async fn create_unlocks_and_returns_words() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        let words = vault
            .create(MasterSecret::new("pw"), &descriptor, 20)
            .await
            .unwrap();

        assert_eq!(words.len(), 15);
        assert!(vault.is_unlocked().await);
        assert!(vault.exists().await.unwrap());
    }

    #[tokio::test]
    async fn create_twice_is_rejected() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();
        let err = vault
            .create(MasterSecret::new("pw"), &descriptor, 16)
            .await
            .unwrap_err();
        assert!(matches!(err, StrongboxError::Vault(_)));
    }

    #[tokio::test]
    async fn lock_wipes_session_and_password_unlocks_again() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();
        let before = vault.master_key().await.unwrap();

        vault.lock().await;
        assert!(matches!(vault.master_key().await, Err(StrongboxError::Locked)));

        let after = vault
            .unlock_with_password(MasterSecret::new("pw"), &descriptor)
            .await
            .unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn wrong_password_fails_closed() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("right"), &descriptor, 16).await.unwrap();
        vault.lock().await;

        let err = vault
            .unlock_with_password(MasterSecret::new("wrong"), &descriptor)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StrongboxError::Cipher(CipherError::AuthenticationFailed)
        ));
        assert!(!vault.is_unlocked().await);
    }

    #[tokio::test]
    async fn biometry_round_trip() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();
        let expected = vault.master_key().await.unwrap();

        vault.enable_biometry().await.unwrap();
        assert!(vault.is_biometry_enabled().await.unwrap());
        vault.lock().await;

        let unlocked = vault.unlock_with_biometry("unlock vault").await.unwrap();
        assert_eq!(unlocked, expected);
        assert!(vault.is_unlocked().await);
    }

    #[tokio::test]
    async fn disabled_biometry_reports_not_enrolled() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();
        vault.enable_biometry().await.unwrap();
        vault.disable_biometry().await.unwrap();
        vault.lock().await;

        let err = vault.unlock_with_biometry("unlock").await.unwrap_err();
        assert!(matches!(err, StrongboxError::Biometry(BiometryError::NotEnrolled)));
    }

    #[tokio::test]
    async fn enable_biometry_requires_unlock() {
        let (vault, _) = vault_pair();
        vault.create(MasterSecret::new("pw"), &fast_descriptor(), 16).await.unwrap();
        vault.lock().await;
        assert!(matches!(vault.enable_biometry().await, Err(StrongboxError::Locked)));
    }

    #[tokio::test]
    async fn change_password_keeps_words_and_rewraps_biometry() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        let words = vault.create(MasterSecret::new("old"), &descriptor, 16).await.unwrap();
        vault.enable_biometry().await.unwrap();

        let new_key = vault
            .change_password(MasterSecret::new("new"), &descriptor)
            .await
            .unwrap();
        assert_eq!(vault.recovery_words().await.unwrap(), words);

        vault.lock().await;
        assert!(vault
            .unlock_with_password(MasterSecret::new("old"), &descriptor)
            .await
            .is_err());
        assert_eq!(
            vault
                .unlock_with_password(MasterSecret::new("new"), &descriptor)
                .await
                .unwrap(),
            new_key
        );

        vault.lock().await;
        assert_eq!(vault.unlock_with_biometry("unlock").await.unwrap(), new_key);
    }

    #[tokio::test]
    async fn restore_on_new_device_derives_same_key() {
        let (original, _) = vault_pair();
        let descriptor = fast_descriptor();
        let words = original
            .create(MasterSecret::new("pw"), &descriptor, 24)
            .await
            .unwrap();
        let expected = original.master_key().await.unwrap();

        let (fresh, _) = vault_pair();
        let restored = fresh
            .restore(words.words(), MasterSecret::new("pw"), &descriptor)
            .await
            .unwrap();
        assert_eq!(restored, expected);
        assert!(fresh.exists().await.unwrap());
    }

    #[tokio::test]
    async fn failed_restore_keeps_the_existing_vault() {
        let failing = Arc::new(FailingStore {
            inner: MemorySecureStore::new("group.test"),
            fail_writes: AtomicBool::new(false),
        });
        let store: Arc<dyn SecureStore> = failing.clone();
        let vault = KeyVault::new(store.clone(), Arc::new(StoreBiometry(store)));
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();
        let expected = vault.master_key().await.unwrap();
        vault.lock().await;

        let (other, _) = vault_pair();
        let other_words = other
            .create(MasterSecret::new("other"), &fast_descriptor(), 16)
            .await
            .unwrap();

        failing.fail_writes.store(true, Ordering::SeqCst);
        let err = vault
            .restore(other_words.words(), MasterSecret::new("other"), &descriptor)
            .await
            .unwrap_err();
        assert!(matches!(err, StrongboxError::Internal(_)));
        assert!(!vault.is_unlocked().await);
        assert!(vault.exists().await.unwrap());

        failing.fail_writes.store(false, Ordering::SeqCst);
        let unlocked = vault
            .unlock_with_password(MasterSecret::new("pw"), &descriptor)
            .await
            .unwrap();
        assert_eq!(unlocked, expected);
    }

    #[tokio::test]
    async fn restore_replaces_biometry_slots_of_the_previous_vault() {
        let (vault, store) = vault_pair();
        let descriptor = fast_descriptor();
        let words = vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();
        vault.enable_biometry().await.unwrap();

        vault
            .restore(words.words(), MasterSecret::new("pw"), &descriptor)
            .await
            .unwrap();
        assert!(store.read(KeySlot::BiometryKey).await.unwrap().is_none());
        assert!(store.read(KeySlot::MasterKey).await.unwrap().is_none());
        assert!(vault.exists().await.unwrap());
    }

    #[tokio::test]
    async fn recovery_words_require_unlock() {
        let (vault, _) = vault_pair();
        vault.create(MasterSecret::new("pw"), &fast_descriptor(), 16).await.unwrap();
        vault.lock().await;
        assert!(matches!(vault.recovery_words().await, Err(StrongboxError::Locked)));
    }

    #[tokio::test]
    async fn reset_app_purges_every_slot() {
        let (vault, store) = vault_pair();
        vault.create(MasterSecret::new("pw"), &fast_descriptor(), 16).await.unwrap();
        vault.enable_biometry().await.unwrap();

        vault.reset_app().await.unwrap();
        assert!(!vault.is_unlocked().await);
        for slot in KeySlot::ALL {
            assert!(store.read(slot).await.unwrap().is_none(), "{slot} survived reset");
        }
    }

    #[tokio::test]
    async fn value_copied_into_another_slot_does_not_open() {
        let (vault, store) = vault_pair();
        let descriptor = fast_descriptor();
        vault.create(MasterSecret::new("pw"), &descriptor, 16).await.unwrap();

        let entropy = store.read(KeySlot::Entropy).await.unwrap().unwrap();
        store.save(KeySlot::EncryptionReference, &entropy).await.unwrap();
        vault.lock().await;

        let err = vault
            .unlock_with_password(MasterSecret::new("pw"), &descriptor)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StrongboxError::Cipher(CipherError::AuthenticationFailed)
        ));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn lifecycle_logs_never_contain_secrets() {
        let (vault, _) = vault_pair();
        let descriptor = fast_descriptor();
        vault
            .create(MasterSecret::new("s3cret-Passw0rd"), &descriptor, 16)
            .await
            .unwrap();
        vault.lock().await;
        vault
            .unlock_with_password(MasterSecret::new("s3cret-Passw0rd"), &descriptor)
            .await
            .unwrap();

        assert!(logs_contain("vault created"));
        assert!(!logs_contain("s3cret-Passw0rd"));
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let json = serde_json::to_value(fast_descriptor()).unwrap();
        assert!(json.get("vaultId").is_some());
        assert!(json.get("deviceId").is_some());
        assert_eq!(json["kdfSpec"]["memoryMb"], 8);
    }
}
