// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of the non-secret [`VaultDescriptor`].
//!
//! The descriptor sits in `vault.json` beside the secure store file. It holds
//! no key material, only the identifiers and KDF parameters needed to derive
//! the master key again.

use std::path::{Path, PathBuf};

use strongbox_core::StrongboxError;
use strongbox_vault::VaultDescriptor;
use tracing::debug;

const DESCRIPTOR_FILE: &str = "vault.json";

/// Location of the descriptor for the secure store at `secure_store_path`.
pub fn descriptor_path(secure_store_path: &str) -> PathBuf {
    match Path::new(secure_store_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(DESCRIPTOR_FILE),
        _ => PathBuf::from(DESCRIPTOR_FILE),
    }
}

/// Read the descriptor, or `None` if no vault was created here.
pub fn load_descriptor(path: &Path) -> Result<Option<VaultDescriptor>, StrongboxError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StrongboxError::Storage {
                source: Box::new(e),
            });
        }
    };
    let descriptor = serde_json::from_str(&content)
        .map_err(|e| StrongboxError::Vault(format!("corrupt vault descriptor: {e}")))?;
    Ok(Some(descriptor))
}

pub fn save_descriptor(path: &Path, descriptor: &VaultDescriptor) -> Result<(), StrongboxError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| StrongboxError::Storage {
            source: Box::new(e),
        })?;
    }
    let json = serde_json::to_string_pretty(descriptor)
        .map_err(|e| StrongboxError::Internal(format!("failed to serialize descriptor: {e}")))?;
    std::fs::write(path, json).map_err(|e| StrongboxError::Storage {
        source: Box::new(e),
    })?;
    debug!(path = %path.display(), "vault descriptor written");
    Ok(())
}

pub fn remove_descriptor(path: &Path) -> Result<(), StrongboxError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StrongboxError::Storage {
            source: Box::new(e),
        }),
    }
}
