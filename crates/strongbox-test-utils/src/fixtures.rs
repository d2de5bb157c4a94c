// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample records and parameters shared by integration tests.
//!
//! Records carry opaque payloads; nothing here is real ciphertext.

use strongbox_core::{
    DeletedItemData, ItemContentType, ItemEncryptedData, ItemId, ItemKind, ProtectionLevel,
    SealedBox, Timestamp, VaultId,
};
use strongbox_vault::{KdfSpec, VaultDescriptor};
use uuid::Uuid;

/// Smallest KDF cost the engine accepts. Derives in milliseconds.
pub fn fast_kdf_spec() -> KdfSpec {
    KdfSpec {
        memory_mb: 8,
        iterations: 1,
        parallelism: 1,
        ..KdfSpec::default()
    }
}

/// Fresh vault and device ids with [`fast_kdf_spec`].
pub fn fast_descriptor() -> VaultDescriptor {
    VaultDescriptor::new(fast_kdf_spec())
}

/// Fixed vault id so records built separately compare equal.
pub fn fixture_vault() -> VaultId {
    VaultId(Default::default())
}

/// A login record modified at `modified_ms` with a payload filled with `payload`.
pub fn sample_item(item_id: ItemId, modified_ms: i64, payload: u8) -> ItemEncryptedData {
    ItemEncryptedData {
        item_id,
        vault_id: fixture_vault(),
        kind: ItemKind::Login,
        content_type: ItemContentType::Login,
        created_at: Timestamp::from_millis(0),
        modified_at: Timestamp::from_millis(modified_ms),
        protection_level: ProtectionLevel::Normal,
        tag_ids: Vec::new(),
        content: SealedBox::from_bytes(vec![payload; SealedBox::NONCE_LEN + SealedBox::TAG_LEN + 4]),
    }
}

/// A login tombstone deleted at `deleted_ms`.
pub fn sample_tombstone(item_id: ItemId, deleted_ms: i64) -> DeletedItemData {
    DeletedItemData {
        item_id,
        vault_id: fixture_vault(),
        kind: ItemKind::Login,
        deleted_at: Timestamp::from_millis(deleted_ms),
    }
}

/// `count` deterministic item ids, in ascending order.
pub fn item_ids(count: u8) -> Vec<ItemId> {
    (0..count)
        .map(|n| {
            let mut bytes = [0u8; 16];
            bytes[15] = n;
            ItemId(Uuid::from_bytes(bytes))
        })
        .collect()
}
