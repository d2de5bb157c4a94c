// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master key and the per-vault keys derived from it.
//!
//! Each derived key is HMAC-SHA256 keyed by the master key over
//! `"<vault-uuid>/<suffix>"`:
//!
//! | key      | suffix  | protects                          |
//! |----------|---------|-----------------------------------|
//! | trusted  | `tKey`  | normal and confirm-level items    |
//! | secure   | `sKey`  | top-secret items                  |
//! | external | `eKey`  | exchange documents                |

use std::fmt;
use std::ops::Deref;

use strongbox_core::{
    CipherError, DeviceId, ProtectionLevel, SealedBox, SymmetricKey, VaultId,
};

use crate::crypto;

const TRUSTED_SUFFIX: &str = "tKey";
const SECURE_SUFFIX: &str = "sKey";
const EXTERNAL_SUFFIX: &str = "eKey";

/// Associated data binding an encryption reference to its purpose.
const ENCRYPTION_REFERENCE_AAD: &[u8] = b"strongbox/encryption-reference";
const EXPORT_REFERENCE_AAD: &[u8] = b"strongbox/export-reference";

/// The root key of one vault, derived from entropy and master secret.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterKey(SymmetricKey);

impl MasterKey {
    pub fn new(key: SymmetricKey) -> Self {
        Self(key)
    }

    /// Key for normal and confirm-level items.
    pub fn trusted_key(&self, vault_id: VaultId) -> SymmetricKey {
        self.derive(vault_id, TRUSTED_SUFFIX)
    }

    /// Key for top-secret items.
    pub fn secure_key(&self, vault_id: VaultId) -> SymmetricKey {
        self.derive(vault_id, SECURE_SUFFIX)
    }

    /// Key for exchange documents.
    pub fn external_key(&self, vault_id: VaultId) -> SymmetricKey {
        self.derive(vault_id, EXTERNAL_SUFFIX)
    }

    /// The item key matching a protection level.
    pub fn item_key(&self, vault_id: VaultId, level: ProtectionLevel) -> SymmetricKey {
        match level {
            ProtectionLevel::TopSecret => self.secure_key(vault_id),
            ProtectionLevel::Normal | ProtectionLevel::Confirm => self.trusted_key(vault_id),
        }
    }

    fn derive(&self, vault_id: VaultId, suffix: &str) -> SymmetricKey {
        let message = format!("{vault_id}/{suffix}");
        SymmetricKey::from_bytes(crypto::hmac_sha256(
            self.0.expose(),
            message.as_bytes(),
        ))
    }
}

impl Deref for MasterKey {
    type Target = SymmetricKey;

    fn deref(&self) -> &SymmetricKey {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// Seal the device id under the master key.
///
/// Opening it later proves a candidate master key is the right one before
/// any vault data is touched.
pub fn encryption_reference(
    master_key: &MasterKey,
    device_id: DeviceId,
) -> Result<SealedBox, CipherError> {
    crypto::seal(
        master_key,
        device_id.to_string().as_bytes(),
        ENCRYPTION_REFERENCE_AAD,
    )
}

/// Whether `reference` was produced by [`encryption_reference`] with this key.
pub fn verify_encryption_reference(
    master_key: &MasterKey,
    reference: &SealedBox,
) -> Result<DeviceId, CipherError> {
    let plaintext = crypto::open(master_key, reference, ENCRYPTION_REFERENCE_AAD)?;
    std::str::from_utf8(&plaintext)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(CipherError::MalformedCiphertext)
}

/// Base64 of the vault id sealed under the external key.
pub fn export_reference(external_key: &SymmetricKey, vault_id: VaultId) -> Result<String, CipherError> {
    let sealed = crypto::seal(
        external_key,
        vault_id.to_string().as_bytes(),
        EXPORT_REFERENCE_AAD,
    )?;
    Ok(sealed.to_base64())
}

/// Whether `reference` opens under `external_key` to `vault_id`.
pub fn verify_export_reference(
    external_key: &SymmetricKey,
    vault_id: VaultId,
    reference: &str,
) -> bool {
    let Ok(sealed) = SealedBox::from_base64(reference) else {
        return false;
    };
    match crypto::open(external_key, &sealed, EXPORT_REFERENCE_AAD) {
        Ok(plaintext) => plaintext.as_slice() == vault_id.to_string().as_bytes(),
        Err(_) => false,
    }
}
