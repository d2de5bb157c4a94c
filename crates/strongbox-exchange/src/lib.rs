// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portable exchange documents for Strongbox vaults.
//!
//! An exchange document is schema-versioned JSON carrying a vault's identity,
//! its KDF parameters, a seed hash, and its logins, tags, and deletions,
//! either in the clear or sealed under the vault's external key.
//!
//! Import checks run in a fixed order so the most specific error wins:
//! schema version, then seed hash, then key derivation and reference, then
//! each entry on its own (a bad entry is reported, not fatal).

pub mod codec;
pub mod document;
pub mod model;

pub use codec::{
    decode, encode, import, EntryFailure, ExportError, ExportKeys, FailureReason,
    ImportCredentials, ImportedVault, Section,
};
pub use document::{parse, ExchangeVault, Origin, CURRENT_SCHEMA_VERSION};
pub use model::{Login, LoginUri, Tag, VaultState};
