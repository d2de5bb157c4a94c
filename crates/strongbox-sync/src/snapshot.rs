// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Point-in-time view of one side (local or cloud) of a vault.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};
use strongbox_core::{DeletedItemData, ItemEncryptedData, ItemId, ItemKind, Timestamp, VaultId};

use crate::merge;

/// Identity of a record across both sides.
pub type RecordKey = (ItemKind, ItemId);

/// A record that exists on one side. A missing key means Absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RecordState {
    Present(ItemEncryptedData),
    Tombstoned(DeletedItemData),
}

impl RecordState {
    pub fn key(&self) -> RecordKey {
        match self {
            Self::Present(item) => (item.kind, item.item_id),
            Self::Tombstoned(deleted) => (deleted.kind, deleted.item_id),
        }
    }

    /// Modification time for records, deletion time for tombstones.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Present(item) => item.modified_at,
            Self::Tombstoned(deleted) => deleted.deleted_at,
        }
    }

    pub fn vault_id(&self) -> VaultId {
        match self {
            Self::Present(item) => item.vault_id,
            Self::Tombstoned(deleted) => deleted.vault_id,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        matches!(self, Self::Tombstoned(_))
    }
}

/// Every record and tombstone on one side, keyed by [`RecordKey`].
///
/// Serialized as separate `items` and `deleted` lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotParts", into = "SnapshotParts")]
pub struct Snapshot {
    records: BTreeMap<RecordKey, RecordState>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotParts {
    #[serde(default)]
    items: Vec<ItemEncryptedData>,
    #[serde(default)]
    deleted: Vec<DeletedItemData>,
}

impl From<SnapshotParts> for Snapshot {
    fn from(parts: SnapshotParts) -> Self {
        Snapshot::from_parts(parts.items, parts.deleted)
    }
}

impl From<Snapshot> for SnapshotParts {
    fn from(snapshot: Snapshot) -> Self {
        let mut parts = SnapshotParts {
            items: Vec::new(),
            deleted: Vec::new(),
        };
        for state in snapshot.records.into_values() {
            match state {
                RecordState::Present(item) => parts.items.push(item),
                RecordState::Tombstoned(deleted) => parts.deleted.push(deleted),
            }
        }
        parts
    }
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from raw lists.
    ///
    /// A key listed more than once (for example both as an item and as a
    /// tombstone) keeps whichever state wins under the merge rule.
    pub fn from_parts(
        items: impl IntoIterator<Item = ItemEncryptedData>,
        deleted: impl IntoIterator<Item = DeletedItemData>,
    ) -> Self {
        let mut snapshot = Self::new();
        let states = items
            .into_iter()
            .map(RecordState::Present)
            .chain(deleted.into_iter().map(RecordState::Tombstoned));
        for state in states {
            snapshot.absorb(state);
        }
        snapshot
    }

    /// Insert `state`, keeping the existing one if it takes precedence.
    pub fn absorb(&mut self, state: RecordState) {
        match self.records.entry(state.key()) {
            Entry::Vacant(slot) => {
                slot.insert(state);
            }
            Entry::Occupied(mut slot) => {
                if merge::precedence(&state, slot.get()).is_gt() {
                    slot.insert(state);
                }
            }
        }
    }

    /// Insert `state` unconditionally, replacing any previous state.
    pub fn set(&mut self, state: RecordState) {
        self.records.insert(state.key(), state);
    }

    /// The records and tombstones that belong to `vault_id`.
    pub fn for_vault(&self, vault_id: VaultId) -> Snapshot {
        let records = self
            .records
            .iter()
            .filter(|(_, state)| state.vault_id() == vault_id)
            .map(|(key, state)| (*key, state.clone()))
            .collect();
        Snapshot { records }
    }

    pub fn get(&self, key: &RecordKey) -> Option<&RecordState> {
        self.records.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &RecordKey> {
        self.records.keys()
    }

    pub fn states(&self) -> impl Iterator<Item = &RecordState> {
        self.records.values()
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemEncryptedData> {
        self.records.values().filter_map(|state| match state {
            RecordState::Present(item) => Some(item),
            RecordState::Tombstoned(_) => None,
        })
    }

    pub fn tombstones(&self) -> impl Iterator<Item = &DeletedItemData> {
        self.records.values().filter_map(|state| match state {
            RecordState::Tombstoned(deleted) => Some(deleted),
            RecordState::Present(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
