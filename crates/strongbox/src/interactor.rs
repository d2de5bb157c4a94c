// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry points for presentation-layer callers.
//!
//! [`VaultInteractor`] wraps a [`KeyVault`] and routes every operation that
//! needs key material through its session, so nothing here runs while the
//! vault is locked.

use std::sync::Arc;

use strongbox_core::{
    ItemContentType, ItemEncryptedData, ItemKind, KdfError, KeySlot, ProtectionLevel,
    RecoveryError, StrongboxError, SymmetricKey, Timestamp, VaultId,
};
use strongbox_exchange::{
    ExchangeVault, ExportKeys, ImportCredentials, ImportedVault, Login, Origin, Tag, VaultState,
};
use strongbox_sync::{CloudMerge, MergePlan, RecordState, Snapshot, VaultHeader};
use strongbox_vault::cipher::{self, ItemMetadata};
use strongbox_vault::recovery::{self, Entropy, RecoveryWords};
use strongbox_vault::{kdf, KeyVault, MasterKey, MasterSecret, VaultDescriptor};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Cloud schema written alongside the vault's records.
pub const CLOUD_SCHEMA_VERSION: u32 = strongbox_sync::SUPPORTED_CLOUD_SCHEMA;

pub struct VaultInteractor {
    key_vault: Arc<KeyVault>,
    device_name: String,
}

impl VaultInteractor {
    pub fn new(key_vault: Arc<KeyVault>, device_name: impl Into<String>) -> Self {
        Self {
            key_vault,
            device_name: device_name.into(),
        }
    }

    pub fn key_vault(&self) -> &KeyVault {
        &self.key_vault
    }

    /// Derive the master key off the async runtime and unlock the vault.
    ///
    /// Cancelling `cancel` abandons the derivation: the result is discarded,
    /// the session stays locked and nothing is written.
    pub async fn derive_and_unlock(
        &self,
        secret: MasterSecret,
        descriptor: &VaultDescriptor,
        cancel: &CancellationToken,
    ) -> Result<MasterKey, StrongboxError> {
        let entropy = self.key_vault.entropy().await?;
        let spec = descriptor.kdf_spec;
        let derivation =
            tokio::task::spawn_blocking(move || kdf::derive(&secret, &entropy, &spec));

        let master_key = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("key derivation cancelled");
                return Err(KdfError::Cancelled.into());
            }
            joined = derivation => joined
                .map_err(|e| StrongboxError::Internal(format!("key derivation task failed: {e}")))??,
        };

        self.key_vault.unlock_with_key(master_key.clone()).await?;
        info!(vault_id = %descriptor.vault_id, "vault unlocked");
        Ok(master_key)
    }

    /// Seal `plaintext` with the session key for the metadata's vault and
    /// protection level.
    pub async fn encrypt_item(
        &self,
        metadata: ItemMetadata,
        plaintext: &[u8],
    ) -> Result<ItemEncryptedData, StrongboxError> {
        let master_key = self.key_vault.master_key().await?;
        let key = master_key.item_key(metadata.vault_id, metadata.protection_level);
        Ok(cipher::encrypt(metadata, plaintext, &key)?)
    }

    /// Open a record with the session key. Fails closed on any corruption.
    pub async fn decrypt_item(
        &self,
        data: &ItemEncryptedData,
    ) -> Result<Zeroizing<Vec<u8>>, StrongboxError> {
        let master_key = self.key_vault.master_key().await?;
        let key = master_key.item_key(data.vault_id, data.protection_level);
        Ok(cipher::decrypt(data, &key)?)
    }

    /// Compute the writes that reconcile local and cloud state.
    pub fn merge_vault_state(&self, local: &Snapshot, cloud: &Snapshot) -> MergePlan {
        strongbox_sync::merge(local, cloud)
    }

    /// Check the cloud vault can be read and written here, then merge the
    /// records of the local vault.
    ///
    /// With `multi_device` set, a cloud vault owned by another device is
    /// taken over and the result carries the header to write back.
    pub fn merge_cloud_vault(
        &self,
        local_header: &VaultHeader,
        cloud_header: &VaultHeader,
        local: &Snapshot,
        cloud: &Snapshot,
        multi_device: bool,
    ) -> Result<CloudMerge, StrongboxError> {
        Ok(strongbox_sync::merge_cloud(
            local_header,
            cloud_header,
            local,
            cloud,
            multi_device,
        )?)
    }

    /// Header describing this vault to the cloud. Requires an unlocked session.
    pub async fn vault_header(
        &self,
        descriptor: &VaultDescriptor,
    ) -> Result<VaultHeader, StrongboxError> {
        self.key_vault.master_key().await?;
        let entropy = self.key_vault.entropy().await?;
        Ok(VaultHeader {
            schema_version: CLOUD_SCHEMA_VERSION,
            vault_id: descriptor.vault_id,
            device_id: descriptor.device_id,
            seed_hash: recovery::seed_hash(&entropy, descriptor.vault_id),
            kdf_spec: descriptor.kdf_spec,
        })
    }

    /// Build an exchange document from the stored records of this vault.
    ///
    /// Records are opened with the session key. A record that fails to open,
    /// or whose content type has no exchange form, is left out and logged;
    /// tombstones are always exported.
    pub async fn export_vault(
        &self,
        descriptor: &VaultDescriptor,
        name: &str,
        records: &Snapshot,
        encrypt: bool,
    ) -> Result<ExchangeVault, StrongboxError> {
        let master_key = self.key_vault.master_key().await?;
        let vault_id = descriptor.vault_id;
        let mut state = VaultState::new(vault_id, name);

        for record in records.states() {
            match record {
                RecordState::Present(item) if item.vault_id == vault_id => {
                    if item.kind == ItemKind::Login && item.content_type != ItemContentType::Login {
                        warn!(
                            item_id = %item.item_id,
                            content_type = %item.content_type,
                            "record type not supported by the exchange format, skipped"
                        );
                        continue;
                    }
                    let key = master_key.item_key(vault_id, item.protection_level);
                    let opened = cipher::decrypt(item, &key)
                        .map_err(StrongboxError::from)
                        .and_then(|plaintext| push_plaintext(&mut state, item.kind, &plaintext));
                    if let Err(e) = opened {
                        warn!(item_id = %item.item_id, error = %e, "record left out of export");
                    }
                }
                RecordState::Present(_) => {}
                RecordState::Tombstoned(deleted) => state.deleted.push(*deleted),
            }
        }
        state.updated_at = Timestamp::now();

        let keys = if encrypt {
            let entropy = self.key_vault.entropy().await?;
            Some(ExportKeys {
                external_key: master_key.external_key(vault_id),
                seed_hash: recovery::seed_hash(&entropy, vault_id),
                kdf_spec: descriptor.kdf_spec,
            })
        } else {
            None
        };
        let origin = Origin::current(&self.device_name, Some(descriptor.device_id));
        Ok(strongbox_exchange::encode(&state, origin, keys.as_ref())?)
    }

    /// Decode an exchange document on the blocking pool.
    ///
    /// Recovery credentials run the full key derivation, which can take
    /// seconds.
    pub async fn import_vault(
        &self,
        json: String,
        credentials: Option<ImportCredentials>,
    ) -> Result<ImportedVault, StrongboxError> {
        let imported = tokio::task::spawn_blocking(move || {
            strongbox_exchange::import(&json, credentials.as_ref())
        })
        .await
        .map_err(|e| StrongboxError::Internal(format!("import task failed: {e}")))??;

        info!(
            vault_id = %imported.state.vault_id,
            logins = imported.state.logins.len(),
            failures = imported.failures.len(),
            "exchange document imported"
        );
        Ok(imported)
    }

    /// Credentials from this vault's own external key, for documents it
    /// exported itself.
    pub async fn own_import_credentials(
        &self,
        vault_id: VaultId,
    ) -> Result<ImportCredentials, StrongboxError> {
        let master_key = self.key_vault.master_key().await?;
        Ok(ImportCredentials::ExternalKey(master_key.external_key(vault_id)))
    }

    /// Seal imported entries as records of `target`, ready to merge.
    pub async fn seal_imported(
        &self,
        imported: &ImportedVault,
        target: VaultId,
    ) -> Result<Snapshot, StrongboxError> {
        let master_key = self.key_vault.master_key().await?;
        let mut items = Vec::with_capacity(imported.state.logins.len() + imported.state.tags.len());

        for login in &imported.state.logins {
            let metadata = ItemMetadata {
                item_id: login.id,
                vault_id: target,
                kind: ItemKind::Login,
                content_type: ItemContentType::Login,
                created_at: login.created_at,
                modified_at: login.updated_at,
                protection_level: login.protection_level(),
                tag_ids: login.tags.clone(),
            };
            items.push(seal_json(&master_key, metadata, login)?);
        }
        for tag in &imported.state.tags {
            let metadata = ItemMetadata {
                item_id: tag.id,
                vault_id: target,
                kind: ItemKind::Tag,
                content_type: ItemContentType::default(),
                created_at: tag.updated_at,
                modified_at: tag.updated_at,
                protection_level: ProtectionLevel::Normal,
                tag_ids: Vec::new(),
            };
            items.push(seal_json(&master_key, metadata, tag)?);
        }
        let deleted = imported.state.deleted.iter().map(|d| {
            let mut d = *d;
            d.vault_id = target;
            d
        });
        Ok(Snapshot::from_parts(items, deleted))
    }

    pub fn words_for_entropy(&self, entropy: &Entropy) -> Result<RecoveryWords, RecoveryError> {
        recovery::entropy_to_words(entropy)
    }

    pub fn entropy_for_words<S: AsRef<str>>(&self, words: &[S]) -> Result<Entropy, RecoveryError> {
        recovery::words_to_entropy(words)
    }

    pub async fn read_slot(&self, slot: KeySlot) -> Result<Option<Zeroizing<Vec<u8>>>, StrongboxError> {
        self.key_vault.read(slot).await
    }

    pub async fn save_slot(&self, slot: KeySlot, value: &[u8]) -> Result<(), StrongboxError> {
        self.key_vault.save(slot, value).await
    }

    pub async fn clear_slot(&self, slot: KeySlot) -> Result<(), StrongboxError> {
        self.key_vault.clear(slot).await
    }
}

fn seal_json<T: serde::Serialize>(
    master_key: &MasterKey,
    metadata: ItemMetadata,
    value: &T,
) -> Result<ItemEncryptedData, StrongboxError> {
    let key: SymmetricKey = master_key.item_key(metadata.vault_id, metadata.protection_level);
    let json = Zeroizing::new(
        serde_json::to_vec(value).map_err(|e| StrongboxError::Internal(e.to_string()))?,
    );
    Ok(cipher::encrypt(metadata, &json, &key)?)
}

fn push_plaintext(
    state: &mut VaultState,
    kind: ItemKind,
    plaintext: &[u8],
) -> Result<(), StrongboxError> {
    let invalid = |e: serde_json::Error| StrongboxError::Vault(format!("unreadable record: {e}"));
    match kind {
        ItemKind::Login => state
            .logins
            .push(serde_json::from_slice::<Login>(plaintext).map_err(invalid)?),
        ItemKind::Tag => state
            .tags
            .push(serde_json::from_slice::<Tag>(plaintext).map_err(invalid)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_core::{CipherError, ItemId};
    use strongbox_test_utils::TestHarness;

    async fn interactor(password: &str) -> (VaultInteractor, VaultDescriptor) {
        let harness = TestHarness::unlocked(password).await.unwrap();
        let descriptor = harness.descriptor;
        (
            VaultInteractor::new(Arc::new(harness.vault), "test-device"),
            descriptor,
        )
    }

    fn login(name: &str) -> Login {
        let mut login = Login::new(ItemId::new_v4(), Timestamp::from_millis(1_000));
        login.name = Some(name.into());
        login.password = Some(format!("{name}-password"));
        login
    }

    async fn sealed_login(
        interactor: &VaultInteractor,
        descriptor: &VaultDescriptor,
        login: &Login,
        level: ProtectionLevel,
    ) -> ItemEncryptedData {
        let mut metadata = ItemMetadata::new(descriptor.vault_id, ItemKind::Login, level);
        metadata.item_id = login.id;
        let json = serde_json::to_vec(login).unwrap();
        interactor.encrypt_item(metadata, &json).await.unwrap()
    }

    #[tokio::test]
    async fn item_round_trip_through_session() {
        let (interactor, descriptor) = interactor("pw").await;
        let metadata =
            ItemMetadata::new(descriptor.vault_id, ItemKind::Login, ProtectionLevel::TopSecret);
        let sealed = interactor.encrypt_item(metadata, b"secret").await.unwrap();
        assert_eq!(
            interactor.decrypt_item(&sealed).await.unwrap().as_slice(),
            b"secret"
        );
    }

    #[tokio::test]
    async fn item_calls_fail_when_locked() {
        let (interactor, descriptor) = interactor("pw").await;
        let metadata = ItemMetadata::new(descriptor.vault_id, ItemKind::Login, ProtectionLevel::Normal);
        let sealed = interactor.encrypt_item(metadata.clone(), b"x").await.unwrap();

        interactor.key_vault().lock().await;
        assert!(matches!(
            interactor.encrypt_item(metadata, b"x").await,
            Err(StrongboxError::Locked)
        ));
        assert!(matches!(
            interactor.decrypt_item(&sealed).await,
            Err(StrongboxError::Locked)
        ));
    }

    #[tokio::test]
    async fn protection_levels_use_different_keys() {
        let (interactor, descriptor) = interactor("pw").await;
        let metadata =
            ItemMetadata::new(descriptor.vault_id, ItemKind::Login, ProtectionLevel::TopSecret);
        let mut sealed = interactor.encrypt_item(metadata, b"secret").await.unwrap();
        sealed.protection_level = ProtectionLevel::Normal;
        assert!(matches!(
            interactor.decrypt_item(&sealed).await,
            Err(StrongboxError::Cipher(CipherError::AuthenticationFailed))
        ));
    }

    #[tokio::test]
    async fn derive_and_unlock_relocks_with_the_same_key() {
        let (interactor, descriptor) = interactor("pw").await;
        let before = interactor.key_vault().master_key().await.unwrap();
        interactor.key_vault().lock().await;

        let after = interactor
            .derive_and_unlock(MasterSecret::new("pw"), &descriptor, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(before, after);
        assert!(interactor.key_vault().is_unlocked().await);
    }

    #[tokio::test]
    async fn cancelled_derivation_leaves_vault_locked() {
        let (interactor, descriptor) = interactor("pw").await;
        interactor.key_vault().lock().await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = interactor
            .derive_and_unlock(MasterSecret::new("pw"), &descriptor, &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, StrongboxError::Kdf(KdfError::Cancelled)));
        assert!(!interactor.key_vault().is_unlocked().await);
    }

    #[tokio::test]
    async fn export_then_import_with_own_key() {
        let (interactor, descriptor) = interactor("pw").await;
        let first = login("mail");
        let second = login("bank");
        let records = Snapshot::from_parts(
            [
                sealed_login(&interactor, &descriptor, &first, ProtectionLevel::Normal).await,
                sealed_login(&interactor, &descriptor, &second, ProtectionLevel::TopSecret).await,
            ],
            [],
        );

        let document = interactor
            .export_vault(&descriptor, "Main", &records, true)
            .await
            .unwrap();
        let json = document.to_json().unwrap();
        assert!(!json.contains("mail-password"));

        let creds = interactor
            .own_import_credentials(descriptor.vault_id)
            .await
            .unwrap();
        let imported = interactor.import_vault(json, Some(creds)).await.unwrap();
        assert!(imported.failures.is_empty());
        assert_eq!(imported.state.logins.len(), 2);
        assert!(imported.state.logins.contains(&first));
        assert!(imported.state.logins.contains(&second));
    }

    #[tokio::test]
    async fn imported_entries_seal_into_mergeable_records() {
        let (interactor, descriptor) = interactor("pw").await;
        let entry = login("forum");
        let records = Snapshot::from_parts(
            [sealed_login(&interactor, &descriptor, &entry, ProtectionLevel::Confirm).await],
            [],
        );
        let json = interactor
            .export_vault(&descriptor, "Main", &records, false)
            .await
            .unwrap()
            .to_json()
            .unwrap();
        let imported = interactor.import_vault(json, None).await.unwrap();

        let staged = interactor
            .seal_imported(&imported, descriptor.vault_id)
            .await
            .unwrap();
        let plan = interactor.merge_vault_state(&Snapshot::new(), &staged);
        assert_eq!(plan.local_writes.len(), 1);

        let record = staged.items().next().unwrap();
        assert_eq!(record.protection_level, ProtectionLevel::Confirm);
        let plaintext = interactor.decrypt_item(record).await.unwrap();
        let back: Login = serde_json::from_slice(&plaintext).unwrap();
        assert_eq!(back, entry);
    }

    #[tokio::test]
    async fn cloud_vault_with_other_seed_is_refused() {
        let (interactor, descriptor) = interactor("pw").await;
        let local = interactor.vault_header(&descriptor).await.unwrap();
        let cloud = VaultHeader {
            seed_hash: "00".repeat(32),
            ..local.clone()
        };
        let err = interactor
            .merge_cloud_vault(&local, &cloud, &Snapshot::new(), &Snapshot::new(), true)
            .unwrap_err();
        assert!(matches!(
            err,
            StrongboxError::Sync(strongbox_core::SyncError::IncorrectEncryption)
        ));
    }

    #[tokio::test]
    async fn cloud_merge_ignores_records_of_other_vaults() {
        let (interactor, descriptor) = interactor("pw").await;
        let header = interactor.vault_header(&descriptor).await.unwrap();
        let own = sealed_login(&interactor, &descriptor, &login("own"), ProtectionLevel::Normal).await;
        let other = VaultDescriptor::new(descriptor.kdf_spec);
        let foreign = sealed_login(&interactor, &other, &login("foreign"), ProtectionLevel::Normal).await;
        let cloud = Snapshot::from_parts([own.clone(), foreign], []);

        let merged = interactor
            .merge_cloud_vault(&header, &header, &Snapshot::new(), &cloud, false)
            .unwrap();
        assert_eq!(merged.plan.local_writes, vec![strongbox_sync::WriteOp::Create(own)]);
        assert!(merged.cloud_header.is_none());
    }

    #[tokio::test]
    async fn cloud_vault_of_another_device_needs_multi_device_sync() {
        let (interactor, descriptor) = interactor("pw").await;
        let local = interactor.vault_header(&descriptor).await.unwrap();
        assert_eq!(local.device_id, descriptor.device_id);
        let cloud = VaultHeader {
            device_id: strongbox_core::DeviceId::new_v4(),
            ..local.clone()
        };

        let err = interactor
            .merge_cloud_vault(&local, &cloud, &Snapshot::new(), &Snapshot::new(), false)
            .unwrap_err();
        assert!(matches!(
            err,
            StrongboxError::Sync(strongbox_core::SyncError::SyncNotAllowed)
        ));

        let merged = interactor
            .merge_cloud_vault(&local, &cloud, &Snapshot::new(), &Snapshot::new(), true)
            .unwrap();
        assert_eq!(merged.cloud_header.unwrap().device_id, descriptor.device_id);
    }

    #[tokio::test]
    async fn export_skips_content_types_without_exchange_form() {
        let (interactor, descriptor) = interactor("pw").await;
        let entry = login("mail");
        let note = ItemMetadata::new(descriptor.vault_id, ItemKind::Login, ProtectionLevel::Normal)
            .with_content_type(ItemContentType::SecureNote);
        let card = ItemMetadata::new(descriptor.vault_id, ItemKind::Login, ProtectionLevel::Normal)
            .with_content_type(ItemContentType::Unknown("paymentCard".into()));
        let records = Snapshot::from_parts(
            [
                sealed_login(&interactor, &descriptor, &entry, ProtectionLevel::Normal).await,
                interactor.encrypt_item(note, br#"{"text":"note body"}"#).await.unwrap(),
                interactor.encrypt_item(card, br#"{"number":"4111"}"#).await.unwrap(),
            ],
            [],
        );

        let document = interactor
            .export_vault(&descriptor, "Main", &records, false)
            .await
            .unwrap();
        let imported = interactor
            .import_vault(document.to_json().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(imported.state.logins, vec![entry]);
        assert!(imported.failures.is_empty());
    }

    #[tokio::test]
    async fn words_and_entropy_convert_both_ways() {
        let (interactor, _) = interactor("pw").await;
        let entropy = Entropy::from_bytes(&[9u8; 24]).unwrap();
        let words = interactor.words_for_entropy(&entropy).unwrap();
        assert_eq!(words.len(), 18);
        assert_eq!(interactor.entropy_for_words(words.words()).unwrap(), entropy);
    }

    #[tokio::test]
    async fn slot_accessors_share_the_store() {
        let (interactor, _) = interactor("pw").await;
        assert!(interactor.read_slot(KeySlot::Entropy).await.unwrap().is_some());

        interactor.save_slot(KeySlot::BiometryKey, &[1u8; 32]).await.unwrap();
        assert_eq!(
            interactor
                .read_slot(KeySlot::BiometryKey)
                .await
                .unwrap()
                .as_deref()
                .map(Vec::as_slice),
            Some(&[1u8; 32][..])
        );
        interactor.clear_slot(KeySlot::BiometryKey).await.unwrap();
        assert!(interactor.read_slot(KeySlot::BiometryKey).await.unwrap().is_none());
    }
}
