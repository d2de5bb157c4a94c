// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongbox merge` command implementation.
//!
//! Reads two snapshot files and prints the merge result as JSON. Records stay
//! sealed throughout; no key material is needed. With vault headers the cloud
//! vault is checked first and only the local vault's records are merged.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use strongbox_core::StrongboxError;
use strongbox_sync::{merge, merge_cloud, CloudMerge, Snapshot, VaultHeader};

/// Paths of the cloud and local vault headers, checked before merging.
pub struct HeaderPaths {
    pub local: PathBuf,
    pub cloud: PathBuf,
}

/// Run the `strongbox merge` command.
pub fn run_merge(
    local: &Path,
    cloud: &Path,
    headers: Option<HeaderPaths>,
    multi_device: bool,
    out: Option<&Path>,
) -> Result<(), StrongboxError> {
    let headers = match headers {
        Some(paths) => Some((
            read_json::<VaultHeader>(&paths.local)?,
            read_json::<VaultHeader>(&paths.cloud)?,
        )),
        None => None,
    };
    let local: Snapshot = read_json(local)?;
    let cloud: Snapshot = read_json(cloud)?;

    let result = match headers {
        Some((local_header, cloud_header)) => {
            merge_cloud(&local_header, &cloud_header, &local, &cloud, multi_device)?
        }
        None => CloudMerge {
            plan: merge(&local, &cloud),
            cloud_header: None,
        },
    };

    let json = render_result(&result)?;
    match out {
        Some(path) => std::fs::write(path, json).map_err(|e| StrongboxError::Storage {
            source: Box::new(e),
        })?,
        None => println!("{json}"),
    }
    Ok(())
}

fn render_result(result: &CloudMerge) -> Result<String, StrongboxError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| StrongboxError::Internal(format!("failed to serialize merge plan: {e}")))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StrongboxError> {
    let content = std::fs::read_to_string(path).map_err(|e| StrongboxError::Storage {
        source: Box::new(e),
    })?;
    serde_json::from_str(&content)
        .map_err(|e| StrongboxError::Vault(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strongbox_core::{DeviceId, SyncError, VaultId};
    use strongbox_sync::WriteOp;
    use strongbox_test_utils::fixtures::{fixture_vault, item_ids, sample_item, sample_tombstone};
    use strongbox_vault::KdfSpec;

    fn write_json<T: serde::Serialize>(dir: &Path, name: &str, value: &T) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
        path
    }

    fn header(seed_hash: &str) -> VaultHeader {
        VaultHeader {
            schema_version: 1,
            vault_id: fixture_vault(),
            device_id: DeviceId(Default::default()),
            seed_hash: seed_hash.to_string(),
            kdf_spec: KdfSpec::default(),
        }
    }

    #[test]
    fn plan_is_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let ids = item_ids(2);
        let local = Snapshot::from_parts([sample_item(ids[0], 10, 1)], []);
        let cloud = Snapshot::from_parts([], [sample_tombstone(ids[0], 20)]);
        let local_path = write_json(dir.path(), "local.json", &local);
        let cloud_path = write_json(dir.path(), "cloud.json", &cloud);
        let out = dir.path().join("plan.json");

        run_merge(&local_path, &cloud_path, None, false, Some(&out)).unwrap();

        let result: CloudMerge =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(result.plan, merge(&local, &cloud));
        assert_eq!(result.plan.local_writes.len(), 1);
        assert!(result.plan.cloud_writes.is_empty());
        assert!(result.cloud_header.is_none());
    }

    #[test]
    fn mismatched_headers_stop_the_merge() {
        let dir = tempfile::tempdir().unwrap();
        let empty = write_json(dir.path(), "empty.json", &Snapshot::new());
        let headers = HeaderPaths {
            local: write_json(dir.path(), "local-header.json", &header("aa")),
            cloud: write_json(dir.path(), "cloud-header.json", &header("bb")),
        };
        let out = dir.path().join("plan.json");

        let err = run_merge(&empty, &empty, Some(headers), true, Some(&out)).unwrap_err();
        assert!(matches!(
            err,
            StrongboxError::Sync(SyncError::IncorrectEncryption)
        ));
        assert!(!out.exists());
    }

    #[test]
    fn unreadable_snapshot_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();

        let err = run_merge(&bad, &bad, None, false, None).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn header_checked_merge_drops_foreign_records_and_takes_over() {
        let dir = tempfile::tempdir().unwrap();
        let ids = item_ids(2);
        let own = sample_item(ids[0], 10, 1);
        let mut foreign = sample_item(ids[1], 10, 2);
        foreign.vault_id = VaultId::new_v4();
        let local_path = write_json(dir.path(), "local.json", &Snapshot::new());
        let cloud_path = write_json(
            dir.path(),
            "cloud.json",
            &Snapshot::from_parts([own.clone(), foreign], []),
        );
        let cloud_header = VaultHeader {
            device_id: DeviceId::new_v4(),
            ..header("aa")
        };
        let headers = || HeaderPaths {
            local: write_json(dir.path(), "local-header.json", &header("aa")),
            cloud: write_json(dir.path(), "cloud-header.json", &cloud_header),
        };
        let out = dir.path().join("plan.json");

        let err = run_merge(&local_path, &cloud_path, Some(headers()), false, Some(&out))
            .unwrap_err();
        assert!(matches!(err, StrongboxError::Sync(SyncError::SyncNotAllowed)));

        run_merge(&local_path, &cloud_path, Some(headers()), true, Some(&out)).unwrap();
        let result: CloudMerge =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(result.plan.local_writes, vec![WriteOp::Create(own)]);
        assert_eq!(
            result.cloud_header.unwrap().device_id,
            DeviceId(Default::default())
        );
    }
}
