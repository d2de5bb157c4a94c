// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding vault state into exchange documents and back.

use serde::Serialize;
use serde::de::DeserializeOwned;
use strongbox_core::{
    CipherError, DeletedItemData, ImportError, SealedBox, StrongboxError, SymmetricKey, VaultId,
};
use strongbox_vault::kdf::{self, KdfSpec, MasterSecret};
use strongbox_vault::{crypto, keys, recovery};
use strum::{AsRefStr, Display};
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::document::{
    self, ExchangeDeletedItem, ExchangeEncryption, ExchangeVault, Origin, VaultSection,
    CURRENT_SCHEMA_VERSION,
};
use crate::model::{Login, Tag, VaultState};

/// Entry lists of a document. The name is bound to each sealed entry so an
/// entry cannot be moved to another list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Section {
    Logins,
    Tags,
    ItemsDeleted,
}

/// Why one entry of an otherwise valid document was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("entry is not valid base64")]
    Encoding,
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("entry decrypted but is not a valid record")]
    Malformed,
}

/// One skipped entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryFailure {
    pub section: Section,
    pub index: usize,
    pub reason: FailureReason,
}

/// Result of a successful import. Entries listed in `failures` are missing
/// from `state`; everything else imported.
#[derive(Debug, Clone)]
pub struct ImportedVault {
    pub state: VaultState,
    pub origin: Origin,
    pub encrypted: bool,
    pub failures: Vec<EntryFailure>,
}

/// Keys needed to open an encrypted document.
pub enum ImportCredentials {
    /// Recovery words and master password of the exporting vault.
    Recovery {
        words: Vec<String>,
        password: MasterSecret,
    },
    /// External key of an unlocked vault with the same id.
    ExternalKey(SymmetricKey),
}

/// What an encrypted export is sealed with.
pub struct ExportKeys {
    pub external_key: SymmetricKey,
    pub seed_hash: String,
    pub kdf_spec: KdfSpec,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("failed to serialize exchange entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ExportError> for StrongboxError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Cipher(e) => StrongboxError::Cipher(e),
            ExportError::Serialize(e) => StrongboxError::Internal(e.to_string()),
        }
    }
}

/// Build an exchange document for `state`, encrypted when `export_keys` is given.
pub fn encode(
    state: &VaultState,
    origin: Origin,
    export_keys: Option<&ExportKeys>,
) -> Result<ExchangeVault, ExportError> {
    let mut vault = VaultSection {
        id: state.vault_id,
        name: state.name.clone(),
        created_at: Some(state.created_at),
        updated_at: state.updated_at,
        logins: None,
        logins_encrypted: None,
        tags: None,
        tags_encrypted: None,
        items_deleted: None,
        items_deleted_encrypted: None,
    };
    let deleted: Vec<ExchangeDeletedItem> = state
        .deleted
        .iter()
        .map(|d| ExchangeDeletedItem {
            id: d.item_id,
            kind: d.kind,
            deleted_at: d.deleted_at,
        })
        .collect();

    let encryption = match export_keys {
        None => {
            vault.logins = Some(state.logins.clone());
            vault.tags = Some(state.tags.clone());
            vault.items_deleted = Some(deleted);
            None
        }
        Some(export) => {
            let key = &export.external_key;
            vault.logins_encrypted = Some(seal_all(key, Section::Logins, &state.logins)?);
            vault.tags_encrypted = Some(seal_all(key, Section::Tags, &state.tags)?);
            vault.items_deleted_encrypted = Some(seal_all(key, Section::ItemsDeleted, &deleted)?);
            Some(ExchangeEncryption {
                seed_hash: export.seed_hash.clone(),
                reference: keys::export_reference(key, state.vault_id)?,
                kdf_spec: export.kdf_spec.into(),
            })
        }
    };

    debug!(
        vault_id = %state.vault_id,
        logins = state.logins.len(),
        tags = state.tags.len(),
        deleted = state.deleted.len(),
        encrypted = encryption.is_some(),
        "exchange document encoded"
    );
    Ok(ExchangeVault {
        schema_version: CURRENT_SCHEMA_VERSION,
        origin,
        encryption,
        vault,
    })
}

fn seal_all<T: Serialize>(
    key: &SymmetricKey,
    section: Section,
    entries: &[T],
) -> Result<Vec<String>, ExportError> {
    entries
        .iter()
        .map(|entry| -> Result<String, ExportError> {
            let json = Zeroizing::new(serde_json::to_vec(entry)?);
            let sealed = crypto::seal(key, &json, section.as_ref().as_bytes())?;
            Ok(sealed.to_base64())
        })
        .collect()
}

/// Parse and decode a JSON document in one step.
pub fn import(
    json: &str,
    credentials: Option<&ImportCredentials>,
) -> Result<ImportedVault, ImportError> {
    let document = document::parse(json)?;
    decode(&document, credentials)
}

/// Recover the vault state from a document.
///
/// Document-level problems fail the import. Entries that fail to open are
/// collected in [`ImportedVault::failures`] and the rest still import.
pub fn decode(
    document: &ExchangeVault,
    credentials: Option<&ImportCredentials>,
) -> Result<ImportedVault, ImportError> {
    document::check_schema(document.schema_version)?;
    let section = &document.vault;
    let vault_id = section.id;

    let mut logins = section.logins.clone().unwrap_or_default();
    let mut tags = section.tags.clone().unwrap_or_default();
    let mut deleted = section.items_deleted.clone().unwrap_or_default();
    let mut failures = Vec::new();

    match &document.encryption {
        None if section.has_encrypted_entries() => {
            return Err(ImportError::InvalidDocument(
                "encrypted entries without an encryption header".to_string(),
            ));
        }
        None => {}
        Some(encryption) => {
            let credentials = credentials.ok_or(ImportError::MissingCredentials)?;
            let key = external_key_for(encryption, vault_id, credentials)?;

            logins.extend(open_all::<Login>(
                &key,
                Section::Logins,
                section.logins_encrypted.as_deref(),
                &mut failures,
            ));
            tags.extend(open_all::<Tag>(
                &key,
                Section::Tags,
                section.tags_encrypted.as_deref(),
                &mut failures,
            ));
            deleted.extend(open_all::<ExchangeDeletedItem>(
                &key,
                Section::ItemsDeleted,
                section.items_deleted_encrypted.as_deref(),
                &mut failures,
            ));
        }
    }

    let deleted = deleted
        .into_iter()
        .map(|d| DeletedItemData {
            item_id: d.id,
            vault_id,
            kind: d.kind,
            deleted_at: d.deleted_at,
        })
        .collect::<Vec<_>>();

    debug!(
        %vault_id,
        logins = logins.len(),
        tags = tags.len(),
        deleted = deleted.len(),
        failures = failures.len(),
        "exchange document decoded"
    );
    Ok(ImportedVault {
        state: VaultState {
            vault_id,
            name: section.name.clone(),
            created_at: section.created_at.unwrap_or(section.updated_at),
            updated_at: section.updated_at,
            logins,
            tags,
            deleted,
        },
        origin: document.origin.clone(),
        encrypted: document.encryption.is_some(),
        failures,
    })
}

/// Resolve the external key, checking the seed hash before any derivation
/// and the reference before any entry.
fn external_key_for(
    encryption: &ExchangeEncryption,
    vault_id: VaultId,
    credentials: &ImportCredentials,
) -> Result<SymmetricKey, ImportError> {
    let key = match credentials {
        ImportCredentials::Recovery { words, password } => {
            let entropy = recovery::words_to_entropy(words)?;
            if !recovery::seed_hash(&entropy, vault_id).eq_ignore_ascii_case(&encryption.seed_hash)
            {
                return Err(ImportError::SeedHashMismatch);
            }
            let spec = encryption.kdf_spec.to_spec()?;
            kdf::derive(password, &entropy, &spec)?.external_key(vault_id)
        }
        ImportCredentials::ExternalKey(key) => key.clone(),
    };

    if !keys::verify_export_reference(&key, vault_id, &encryption.reference) {
        return Err(ImportError::ReferenceMismatch);
    }
    Ok(key)
}

fn open_all<T: DeserializeOwned>(
    key: &SymmetricKey,
    section: Section,
    entries: Option<&[String]>,
    failures: &mut Vec<EntryFailure>,
) -> Vec<T> {
    let mut opened = Vec::new();
    for (index, encoded) in entries.unwrap_or_default().iter().enumerate() {
        match open_entry(key, section, encoded) {
            Ok(entry) => opened.push(entry),
            Err(reason) => {
                warn!(%section, index, %reason, "skipping exchange entry");
                failures.push(EntryFailure {
                    section,
                    index,
                    reason,
                });
            }
        }
    }
    opened
}

fn open_entry<T: DeserializeOwned>(
    key: &SymmetricKey,
    section: Section,
    encoded: &str,
) -> Result<T, FailureReason> {
    let sealed = SealedBox::from_base64(encoded).map_err(|_| FailureReason::Encoding)?;
    let json = crypto::open(key, &sealed, section.as_ref().as_bytes())?;
    serde_json::from_slice(&json).map_err(|_| FailureReason::Malformed)
}
