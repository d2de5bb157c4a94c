// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strongbox vault core.
//!
//! This crate provides the error taxonomy, the domain types shared by the
//! vault, sync, and exchange crates, and the capability traits through which
//! platform facilities are injected.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{
    BiometryError, CipherError, ImportError, KdfError, RecoveryError, StrongboxError, SyncError,
};
pub use types::{
    DeletedItemData, DeviceId, ItemContentType, ItemEncryptedData, ItemId, ItemKind, KeySlot,
    ProtectionLevel, SealedBox, SymmetricKey, Timestamp, VaultId,
};

pub use traits::{BiometryAuthenticator, SecureStore};
