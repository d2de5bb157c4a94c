// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-record merge of a local and a cloud snapshot.
//!
//! For each [`RecordKey`] present on either side:
//!
//! - Absent on one side: the other side's state is copied over.
//! - Tombstone vs record: the tombstone wins when `deleted_at >= modified_at`;
//!   otherwise the record was restored after deletion and is re-created on
//!   the tombstoned side.
//! - Record vs record: the later `modified_at` wins. On a tie the greater
//!   sealed payload (byte-wise) wins, then the remaining metadata, so every
//!   device picks the same winner. Identical records produce no write.
//! - Tombstone vs tombstone: the later deletion wins.
//!
//! The order is antisymmetric, so swapping the sides mirrors the plan, and a
//! plan applied to both sides leaves nothing to merge.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use strongbox_core::{DeletedItemData, ItemEncryptedData, SyncError};
use tracing::{debug, warn};

use crate::compat::{check_cloud_vault, VaultHeader};
use crate::plan::{CloudMerge, MergePlan, WriteOp};
use crate::snapshot::{RecordKey, RecordState, Snapshot};

/// How `a` ranks against `b` for the same key. `Greater` means `a` wins;
/// `Equal` means the states are identical.
pub fn precedence(a: &RecordState, b: &RecordState) -> Ordering {
    match (a, b) {
        (RecordState::Present(a), RecordState::Present(b)) => present_order(a, b),
        (RecordState::Tombstoned(a), RecordState::Tombstoned(b)) => tombstone_order(a, b),
        (RecordState::Tombstoned(t), RecordState::Present(p)) => tombstone_vs_record(t, p),
        (RecordState::Present(p), RecordState::Tombstoned(t)) => {
            tombstone_vs_record(t, p).reverse()
        }
    }
}

fn tombstone_vs_record(tombstone: &DeletedItemData, record: &ItemEncryptedData) -> Ordering {
    if tombstone.deleted_at >= record.modified_at {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

fn present_order(a: &ItemEncryptedData, b: &ItemEncryptedData) -> Ordering {
    a.modified_at
        .cmp(&b.modified_at)
        .then_with(|| a.content.cmp(&b.content))
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.protection_level.code().cmp(&b.protection_level.code()))
        .then_with(|| a.tag_ids.cmp(&b.tag_ids))
        .then_with(|| a.content_type.cmp(&b.content_type))
        .then_with(|| a.vault_id.cmp(&b.vault_id))
}

fn tombstone_order(a: &DeletedItemData, b: &DeletedItemData) -> Ordering {
    a.deleted_at
        .cmp(&b.deleted_at)
        .then_with(|| a.vault_id.cmp(&b.vault_id))
}

/// The write that makes a side holding `current` match `winner`.
fn write_for(winner: &RecordState, current: Option<&RecordState>) -> WriteOp {
    match (winner, current) {
        (RecordState::Tombstoned(deleted), _) => WriteOp::Delete(*deleted),
        (RecordState::Present(item), Some(RecordState::Present(_))) => WriteOp::Update(item.clone()),
        (RecordState::Present(item), _) => WriteOp::Create(item.clone()),
    }
}

/// Compute the writes that bring `local` and `cloud` to the same state.
///
/// Pure: neither snapshot is modified and no I/O happens.
pub fn merge(local: &Snapshot, cloud: &Snapshot) -> MergePlan {
    let keys: BTreeSet<&RecordKey> = local.keys().chain(cloud.keys()).collect();
    let mut plan = MergePlan::default();

    for key in keys {
        match (local.get(key), cloud.get(key)) {
            (Some(l), None) => plan.cloud_writes.push(write_for(l, None)),
            (None, Some(c)) => plan.local_writes.push(write_for(c, None)),
            (Some(l), Some(c)) => match precedence(l, c) {
                Ordering::Greater => plan.cloud_writes.push(write_for(l, Some(c))),
                Ordering::Less => plan.local_writes.push(write_for(c, Some(l))),
                Ordering::Equal => {}
            },
            (None, None) => {}
        }
    }

    debug!(
        local_writes = plan.local_writes.len(),
        cloud_writes = plan.cloud_writes.len(),
        "merge plan computed"
    );
    plan
}

/// Check the cloud vault with [`check_cloud_vault`], then merge the records
/// of the local vault.
///
/// Records of any other vault, on either side, are left out of the plan.
pub fn merge_cloud(
    local_header: &VaultHeader,
    cloud_header: &VaultHeader,
    local: &Snapshot,
    cloud: &Snapshot,
    multi_device: bool,
) -> Result<CloudMerge, SyncError> {
    let cloud_header = check_cloud_vault(cloud_header, local_header, multi_device)?;
    let vault_id = local_header.vault_id;
    let local = local.for_vault(vault_id);
    let cloud_own = cloud.for_vault(vault_id);
    let foreign = cloud.len() - cloud_own.len();
    if foreign > 0 {
        warn!(%vault_id, foreign, "cloud records of other vaults ignored");
    }
    Ok(CloudMerge {
        plan: merge(&local, &cloud_own),
        cloud_header,
    })
}
