// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge output: the writes each side needs to converge.

use serde::{Deserialize, Serialize};
use strongbox_core::{DeletedItemData, ItemEncryptedData};

use crate::compat::VaultHeader;
use crate::snapshot::{RecordKey, RecordState, Snapshot};

/// One write against a side's storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "record", rename_all = "camelCase")]
pub enum WriteOp {
    /// The record does not exist on this side, or only as an older tombstone.
    Create(ItemEncryptedData),
    /// Replace an older record with the winner's ciphertext.
    Update(ItemEncryptedData),
    /// Store the tombstone, removing any record.
    Delete(DeletedItemData),
}

impl WriteOp {
    pub fn key(&self) -> RecordKey {
        match self {
            Self::Create(item) | Self::Update(item) => (item.kind, item.item_id),
            Self::Delete(deleted) => (deleted.kind, deleted.item_id),
        }
    }

    /// The state this write leaves behind.
    pub fn resulting_state(&self) -> RecordState {
        match self {
            Self::Create(item) | Self::Update(item) => RecordState::Present(item.clone()),
            Self::Delete(deleted) => RecordState::Tombstoned(*deleted),
        }
    }
}

/// Writes for both sides, each list in ascending [`RecordKey`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    pub local_writes: Vec<WriteOp>,
    pub cloud_writes: Vec<WriteOp>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.local_writes.is_empty() && self.cloud_writes.is_empty()
    }

    /// Apply the local writes to a copy of `local`.
    pub fn apply_local(&self, local: &Snapshot) -> Snapshot {
        apply(local, &self.local_writes)
    }

    /// Apply the cloud writes to a copy of `cloud`.
    pub fn apply_cloud(&self, cloud: &Snapshot) -> Snapshot {
        apply(cloud, &self.cloud_writes)
    }
}

/// Result of merging against a checked cloud vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudMerge {
    pub plan: MergePlan,
    /// Rewritten cloud header to store with the cloud writes, when this
    /// device took the cloud vault over.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_header: Option<VaultHeader>,
}

fn apply(snapshot: &Snapshot, writes: &[WriteOp]) -> Snapshot {
    let mut result = snapshot.clone();
    for write in writes {
        result.set(write.resulting_state());
    }
    result
}
