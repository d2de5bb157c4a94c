// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Item encryption.
//!
//! An item's content is sealed with the key for its protection level; the
//! item id is bound as associated data so a payload cannot be swapped onto a
//! different record without failing authentication.

use strongbox_core::{
    CipherError, ItemContentType, ItemEncryptedData, ItemId, ItemKind, ProtectionLevel,
    SymmetricKey, Timestamp, VaultId,
};
use zeroize::Zeroizing;

use crate::crypto;

/// Unencrypted routing metadata for a record about to be sealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMetadata {
    pub item_id: ItemId,
    pub vault_id: VaultId,
    pub kind: ItemKind,
    pub content_type: ItemContentType,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    pub protection_level: ProtectionLevel,
    pub tag_ids: Vec<ItemId>,
}

impl ItemMetadata {
    /// Metadata for a brand new record created now. Items start as logins;
    /// see [`ItemMetadata::with_content_type`].
    pub fn new(vault_id: VaultId, kind: ItemKind, protection_level: ProtectionLevel) -> Self {
        let now = Timestamp::now();
        Self {
            item_id: ItemId::new_v4(),
            vault_id,
            kind,
            content_type: ItemContentType::default(),
            created_at: now,
            modified_at: now,
            protection_level,
            tag_ids: Vec::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: ItemContentType) -> Self {
        self.content_type = content_type;
        self
    }
}

impl From<&ItemEncryptedData> for ItemMetadata {
    fn from(data: &ItemEncryptedData) -> Self {
        Self {
            item_id: data.item_id,
            vault_id: data.vault_id,
            kind: data.kind,
            content_type: data.content_type.clone(),
            created_at: data.created_at,
            modified_at: data.modified_at,
            protection_level: data.protection_level,
            tag_ids: data.tag_ids.clone(),
        }
    }
}

fn aad(item_id: ItemId) -> [u8; 16] {
    *item_id.as_uuid().as_bytes()
}

/// Seal `plaintext` into a record. A fresh nonce is drawn on every call.
pub fn encrypt(
    metadata: ItemMetadata,
    plaintext: &[u8],
    key: &SymmetricKey,
) -> Result<ItemEncryptedData, CipherError> {
    let content = crypto::seal(key, plaintext, &aad(metadata.item_id))?;
    Ok(ItemEncryptedData {
        item_id: metadata.item_id,
        vault_id: metadata.vault_id,
        kind: metadata.kind,
        content_type: metadata.content_type,
        created_at: metadata.created_at,
        modified_at: metadata.modified_at,
        protection_level: metadata.protection_level,
        tag_ids: metadata.tag_ids,
        content,
    })
}

/// Open a record's content.
pub fn decrypt(
    data: &ItemEncryptedData,
    key: &SymmetricKey,
) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    crypto::open(key, &data.content, &aad(data.item_id))
}

/// Re-seal a record under a new key, as after a password change.
///
/// `modified_at` moves to now so the re-sealed copy supersedes the old one
/// during merge.
pub fn reencrypt(
    data: &ItemEncryptedData,
    old_key: &SymmetricKey,
    new_key: &SymmetricKey,
) -> Result<ItemEncryptedData, CipherError> {
    let plaintext = decrypt(data, old_key)?;
    let mut metadata = ItemMetadata::from(data);
    metadata.modified_at = Timestamp::now().max(data.modified_at);
    encrypt(metadata, &plaintext, new_key)
}
