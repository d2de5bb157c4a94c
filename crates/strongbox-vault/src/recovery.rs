// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault entropy and its BIP-39 English recovery-word encoding.
//!
//! The entropy is generated once per vault and never changes, so the recovery
//! words written down at creation keep working after password changes.

use std::fmt;

use bip39::{Language, Mnemonic};
use strongbox_core::{RecoveryError, StrongboxError, VaultId};
use zeroize::Zeroizing;

use crate::crypto;

/// Entropy sizes accepted by the codec, in bytes.
pub const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];

/// Word counts matching [`ENTROPY_LENGTHS`].
pub const WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// Number of trailing words mixed into the KDF salt.
const SALT_WORDS: usize = 4;

/// Raw vault entropy. Always one of [`ENTROPY_LENGTHS`] bytes long.
#[derive(Clone, PartialEq, Eq)]
pub struct Entropy(Zeroizing<Vec<u8>>);

impl Entropy {
    /// Wraps existing entropy bytes, rejecting unsupported lengths.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecoveryError> {
        if !ENTROPY_LENGTHS.contains(&bytes.len()) {
            return Err(RecoveryError::BadEntropyLength { len: bytes.len() });
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    /// Draws `len` fresh bytes from the system CSPRNG.
    pub fn generate(len: usize) -> Result<Self, StrongboxError> {
        if !ENTROPY_LENGTHS.contains(&len) {
            return Err(RecoveryError::BadEntropyLength { len }.into());
        }
        Ok(Self(crypto::random_bytes(len)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// SHA-256 of the entropy; the fixed prefix of every KDF input.
    pub fn seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(crypto::sha256(&self.0))
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy")
            .field("len", &self.0.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// An ordered list of recovery words. Debug output never shows the words.
#[derive(Clone, PartialEq, Eq)]
pub struct RecoveryWords(Zeroizing<Vec<String>>);

impl RecoveryWords {
    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The words joined by single spaces.
    pub fn phrase(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.join(" "))
    }
}

impl fmt::Debug for RecoveryWords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoveryWords([REDACTED; {}])", self.0.len())
    }
}

/// Encode entropy as BIP-39 English words, checksum included.
pub fn entropy_to_words(entropy: &Entropy) -> Result<RecoveryWords, RecoveryError> {
    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy.as_bytes())
        .map_err(|_| RecoveryError::BadEntropyLength { len: entropy.len() })?;
    let words = mnemonic.words().map(str::to_owned).collect();
    Ok(RecoveryWords(Zeroizing::new(words)))
}

/// Decode recovery words back into entropy.
///
/// Words are matched case-insensitively after trimming. Unknown words are
/// reported by position before the checksum is checked.
pub fn words_to_entropy<S: AsRef<str>>(words: &[S]) -> Result<Entropy, RecoveryError> {
    if !WORD_COUNTS.contains(&words.len()) {
        return Err(RecoveryError::BadWordCount { count: words.len() });
    }

    let normalized: Zeroizing<Vec<String>> = Zeroizing::new(
        words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .collect(),
    );
    if let Some(index) = normalized.iter().position(|w| !is_valid_word(w)) {
        return Err(RecoveryError::UnknownWord { index });
    }

    let phrase = Zeroizing::new(normalized.join(" "));
    let mnemonic =
        Mnemonic::parse_in_normalized(Language::English, &phrase).map_err(|e| match e {
            bip39::Error::BadWordCount(count) => RecoveryError::BadWordCount { count },
            bip39::Error::UnknownWord(index) => RecoveryError::UnknownWord { index },
            _ => RecoveryError::ChecksumMismatch,
        })?;

    let bytes = Zeroizing::new(mnemonic.to_entropy());
    Entropy::from_bytes(&bytes)
}

/// Whether `word` is in the English recovery list (exact, lowercase).
pub fn is_valid_word(word: &str) -> bool {
    Language::English.word_list().iter().any(|w| *w == word)
}

/// Recovery words starting with `prefix`, for input autocompletion.
pub fn suggest_words(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Vec::new();
    }
    Language::English
        .word_list()
        .iter()
        .copied()
        .filter(|w| w.starts_with(prefix.as_str()))
        .collect()
}

/// KDF salt: the first 16 bytes of SHA-256 over the last four words.
pub fn salt_for(entropy: &Entropy) -> Result<[u8; 16], RecoveryError> {
    let words = entropy_to_words(entropy)?;
    let tail = words.words().len().saturating_sub(SALT_WORDS);
    let joined = Zeroizing::new(words.words()[tail..].concat().to_lowercase());

    let digest = crypto::sha256(joined.as_bytes());
    let mut salt = [0u8; 16];
    salt.copy_from_slice(&digest[..16]);
    Ok(salt)
}

/// Non-secret fingerprint of the entropy, bound to one vault.
///
/// Stored in exchange documents so an import can tell wrong recovery words
/// apart from a wrong password without attempting key derivation.
pub fn seed_hash(entropy: &Entropy, vault_id: VaultId) -> String {
    let seed = entropy.seed();
    let message = format!("{vault_id}/eKey");
    hex::encode(crypto::hmac_sha256(seed.as_ref(), message.as_bytes()))
}
