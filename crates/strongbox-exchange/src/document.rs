// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire layout of an exchange document.

use serde::{Deserialize, Serialize};
use strongbox_core::{DeviceId, ImportError, ItemId, ItemKind, KdfError, Timestamp, VaultId};
use strongbox_vault::kdf::{KdfAlgorithm, KdfSpec};

use crate::model::{Login, Tag};

/// Newest document schema this build reads and the one it writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

const APP_VERSION_CODE: u32 = 1;

/// A complete exchange document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeVault {
    pub schema_version: u32,
    pub origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<ExchangeEncryption>,
    pub vault: VaultSection,
}

/// Where and by what build a document was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub os: String,
    pub app_version_code: u32,
    pub app_version_name: String,
    pub device_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DeviceId>,
}

impl Origin {
    /// Origin for a document written by this build on this host.
    pub fn current(device_name: impl Into<String>, device_id: Option<DeviceId>) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            app_version_code: APP_VERSION_CODE,
            app_version_name: env!("CARGO_PKG_VERSION").to_string(),
            device_name: device_name.into(),
            device_id,
        }
    }
}

/// Present only on encrypted documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEncryption {
    pub seed_hash: String,
    pub reference: String,
    pub kdf_spec: ExchangeKdfSpec,
}

/// KDF parameters as written by any build. Missing fields take the defaults
/// of the vault format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeKdfSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<u32>,
}

impl From<KdfSpec> for ExchangeKdfSpec {
    fn from(spec: KdfSpec) -> Self {
        Self {
            algorithm: Some(spec.algorithm.to_string()),
            hash_length: Some(spec.hash_length),
            memory_mb: Some(spec.memory_mb),
            iterations: Some(spec.iterations),
            parallelism: Some(spec.parallelism),
        }
    }
}

impl ExchangeKdfSpec {
    /// The spec to derive with, validated against the engine bounds.
    pub fn to_spec(&self) -> Result<KdfSpec, KdfError> {
        let defaults = KdfSpec::default();
        let algorithm = match &self.algorithm {
            Some(name) => name
                .to_lowercase()
                .parse::<KdfAlgorithm>()
                .map_err(|_| KdfError::InvalidSpec {
                    reason: format!("unknown algorithm `{name}`"),
                })?,
            None => defaults.algorithm,
        };
        let spec = KdfSpec {
            algorithm,
            hash_length: self.hash_length.unwrap_or(defaults.hash_length),
            memory_mb: self.memory_mb.unwrap_or(defaults.memory_mb),
            iterations: self.iterations.unwrap_or(defaults.iterations),
            parallelism: self.parallelism.unwrap_or(defaults.parallelism),
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// The vault and its entries. Each list appears in its plain or its
/// `…Encrypted` form depending on whether the document is encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSection {
    pub id: VaultId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logins: Option<Vec<Login>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logins_encrypted: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags_encrypted: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_deleted: Option<Vec<ExchangeDeletedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_deleted_encrypted: Option<Vec<String>>,
}

impl VaultSection {
    pub(crate) fn has_encrypted_entries(&self) -> bool {
        let non_empty = |list: &Option<Vec<String>>| list.as_ref().is_some_and(|l| !l.is_empty());
        non_empty(&self.logins_encrypted)
            || non_empty(&self.tags_encrypted)
            || non_empty(&self.items_deleted_encrypted)
    }
}

/// A deletion as written in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDeletedItem {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub deleted_at: Timestamp,
}

impl ExchangeVault {
    pub fn is_encrypted(&self) -> bool {
        self.encryption.is_some()
    }

    /// Number of logins, counting either form.
    pub fn login_count(&self) -> usize {
        self.vault
            .logins
            .as_ref()
            .map(Vec::len)
            .or_else(|| self.vault.logins_encrypted.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaProbe {
    schema_version: u32,
}

/// Parse a document, rejecting newer schemas before looking at anything else.
pub fn parse(json: &str) -> Result<ExchangeVault, ImportError> {
    let probe: SchemaProbe =
        serde_json::from_str(json).map_err(|e| ImportError::InvalidDocument(e.to_string()))?;
    check_schema(probe.schema_version)?;
    serde_json::from_str(json).map_err(|e| ImportError::InvalidDocument(e.to_string()))
}

pub(crate) fn check_schema(found: u32) -> Result<(), ImportError> {
    if found > CURRENT_SCHEMA_VERSION {
        return Err(ImportError::UnsupportedSchema {
            found,
            expected: CURRENT_SCHEMA_VERSION,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_schema_is_rejected_even_if_unparseable() {
        let err = parse(r#"{"schemaVersion": 3, "vault": "not an object"}"#).unwrap_err();
        assert_eq!(
            err,
            ImportError::UnsupportedSchema {
                found: 3,
                expected: 2
            }
        );
    }

    #[test]
    fn garbage_is_an_invalid_document() {
        assert!(matches!(
            parse("not json"),
            Err(ImportError::InvalidDocument(_))
        ));
        assert!(matches!(
            parse(r#"{"schemaVersion": 2}"#),
            Err(ImportError::InvalidDocument(_))
        ));
    }

    #[test]
    fn minimal_plain_document_parses() {
        let json = r#"{
            "schemaVersion": 1,
            "origin": {"os": "ios", "appVersionCode": 10, "appVersionName": "1.0", "deviceName": "phone"},
            "vault": {"id": "00000000-0000-4000-8000-000000000001", "name": "Main", "updatedAt": 1700000000000}
        }"#;
        let doc = parse(json).unwrap();
        assert!(!doc.is_encrypted());
        assert_eq!(doc.login_count(), 0);
        assert_eq!(doc.vault.created_at, None);
    }

    #[test]
    fn kdf_spec_fills_missing_fields_with_defaults() {
        let partial = ExchangeKdfSpec {
            algorithm: Some("Argon2id".into()),
            memory_mb: Some(8),
            ..ExchangeKdfSpec::default()
        };
        let spec = partial.to_spec().unwrap();
        assert_eq!(spec.memory_mb, 8);
        assert_eq!(spec.iterations, KdfSpec::default().iterations);
    }

    #[test]
    fn kdf_spec_rejects_unknown_algorithm() {
        let spec = ExchangeKdfSpec {
            algorithm: Some("scrypt".into()),
            ..ExchangeKdfSpec::default()
        };
        assert!(matches!(spec.to_spec(), Err(KdfError::InvalidSpec { .. })));
    }

    #[test]
    fn encryption_header_uses_exchange_names() {
        let header = ExchangeEncryption {
            seed_hash: "00".into(),
            reference: "ref".into(),
            kdf_spec: KdfSpec::default().into(),
        };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["seedHash"], "00");
        assert_eq!(json["kdfSpec"]["type"], "argon2id");
        assert_eq!(json["kdfSpec"]["memoryMb"], 64);
    }
}
