// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks run on a cloud vault before its records are merged.

use serde::{Deserialize, Serialize};
use strongbox_core::{DeviceId, SyncError, VaultId};
use strongbox_vault::KdfSpec;
use tracing::info;

/// Newest cloud vault schema this build can merge.
pub const SUPPORTED_CLOUD_SCHEMA: u32 = 1;

/// Unencrypted identity of a vault, as stored next to its records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultHeader {
    pub schema_version: u32,
    pub vault_id: VaultId,
    /// Device that last took ownership of the cloud copy.
    pub device_id: DeviceId,
    pub seed_hash: String,
    pub kdf_spec: KdfSpec,
}

/// Refuse to merge a cloud vault this device cannot read or may not write.
///
/// Checked in order: schema version, vault identity, encryption (seed hash
/// and KDF parameters must match so both sides derive the same keys), then
/// device ownership.
///
/// A cloud vault owned by another device is refused unless `multi_device` is
/// set, in which case this device takes it over: the returned header carries
/// the local device id and must be written back with the merge. `None` means
/// the cloud header is already current.
pub fn check_cloud_vault(
    cloud: &VaultHeader,
    local: &VaultHeader,
    multi_device: bool,
) -> Result<Option<VaultHeader>, SyncError> {
    if cloud.schema_version > SUPPORTED_CLOUD_SCHEMA {
        return Err(SyncError::NewerVersion {
            found: cloud.schema_version,
            supported: SUPPORTED_CLOUD_SCHEMA,
        });
    }
    if cloud.vault_id != local.vault_id {
        return Err(SyncError::VaultMismatch);
    }
    if !cloud.seed_hash.eq_ignore_ascii_case(&local.seed_hash) || cloud.kdf_spec != local.kdf_spec
    {
        return Err(SyncError::IncorrectEncryption);
    }
    if cloud.device_id == local.device_id {
        return Ok(None);
    }
    if !multi_device {
        return Err(SyncError::SyncNotAllowed);
    }
    info!(vault_id = %cloud.vault_id, "cloud vault taken over by this device");
    Ok(Some(VaultHeader {
        device_id: local.device_id,
        ..cloud.clone()
    }))
}
