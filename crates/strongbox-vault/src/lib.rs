// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key derivation, recovery words, item encryption, and key lifecycle for
//! Strongbox.
//!
//! A vault's master key is Argon2 over its random entropy and the user's
//! master password. Per-vault item keys are derived from the master key, and
//! items are sealed with AES-256-GCM. The [`KeyVault`] keeps the entropy and
//! auxiliary keys in a [`strongbox_core::SecureStore`] and holds the master
//! key in memory only while unlocked.

pub mod biometry;
pub mod cipher;
pub mod crypto;
pub mod kdf;
pub mod keys;
pub mod keyvault;
pub mod prompt;
pub mod recovery;

pub use biometry::{Presence, PresenceCheck, SoftwareBiometry};
pub use cipher::{decrypt, encrypt, reencrypt, ItemMetadata};
pub use kdf::{derive, derive_in_background, KdfAlgorithm, KdfSpec, MasterSecret};
pub use keys::MasterKey;
pub use keyvault::{KeyVault, VaultDescriptor};
pub use recovery::{entropy_to_words, seed_hash, words_to_entropy, Entropy, RecoveryWords};
