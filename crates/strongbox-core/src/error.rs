// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strongbox vault core.
//!
//! Each component has its own error kind so callers can match on the
//! failure they care about; [`StrongboxError`] wraps all of them for code
//! that only needs to propagate. None of these types carry key material or
//! plaintext.

use thiserror::Error;

/// The primary error type used across the vault core.
#[derive(Debug, Error)]
pub enum StrongboxError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Secure store backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Key derivation failed.
    #[error(transparent)]
    Kdf(#[from] KdfError),

    /// Authenticated encryption or decryption failed.
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Recovery words could not be converted to entropy.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    /// Biometric unlock failed; the caller should fall back to the password.
    #[error(transparent)]
    Biometry(#[from] BiometryError),

    /// Exchange document import failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Cloud vault cannot be synchronized with the local one.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Key vault state errors (missing slot, wrong password, corrupted wrap).
    #[error("vault error: {0}")]
    Vault(String),

    /// An operation needed key material but the vault is locked.
    #[error("vault is locked")]
    Locked,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Key derivation failures. Never retried automatically: the same inputs
/// always produce the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KdfError {
    /// Memory, iteration, parallelism, length, or algorithm outside supported bounds.
    #[error("invalid KDF parameters: {reason}")]
    InvalidSpec { reason: String },

    /// The host cannot satisfy the memory cost of this vault.
    #[error("this device cannot allocate {memory_mb} MiB required to decrypt the vault")]
    AllocationFailure { memory_mb: u32 },

    /// Derivation was cancelled before it finished; the result was discarded.
    #[error("key derivation cancelled")]
    Cancelled,
}

/// Authenticated encryption failures. Always fail closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CipherError {
    /// Wrong key or corrupted data.
    #[error("authentication failed: wrong key or corrupted data")]
    AuthenticationFailed,

    /// Sealed buffer too short to contain a nonce and tag.
    #[error("malformed ciphertext")]
    MalformedCiphertext,

    /// Key bytes were rejected by the AEAD implementation.
    #[error("invalid encryption key")]
    KeyRejected,

    /// The system random source failed.
    #[error("random number generator failure")]
    Rng,
}

/// Recovery-word decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    /// The word at `index` is not in the wordlist.
    #[error("word #{} is not a recovery word", .index + 1)]
    UnknownWord { index: usize },

    /// All words are known but the checksum does not verify.
    #[error("recovery words checksum mismatch")]
    ChecksumMismatch,

    /// Word count does not correspond to a supported entropy length.
    #[error("unsupported number of recovery words: {count}")]
    BadWordCount { count: usize },

    /// Entropy length is not one of the supported sizes.
    #[error("unsupported entropy length: {len} bytes")]
    BadEntropyLength { len: usize },
}

/// Biometric unlock failures. All are recoverable by password entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BiometryError {
    #[error("biometric prompt cancelled by user")]
    UserCancelled,

    #[error("biometry is not enrolled")]
    NotEnrolled,

    /// Too many failed attempts.
    #[error("biometry locked out after too many failed attempts")]
    LockedOut,

    #[error("biometry is unavailable")]
    Unavailable,
}

/// Exchange import failures, reported in check order: schema, seed hash,
/// key derivation and reference, then per-item decryption (which is not an
/// error of the whole import).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// Document written by a newer build.
    #[error("unsupported exchange schema version {found} (this build supports up to {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },

    /// Document is not a well-formed exchange vault.
    #[error("invalid exchange document: {0}")]
    InvalidDocument(String),

    /// Document is encrypted but no recovery kit or key was supplied.
    #[error("exchange document is encrypted; recovery words and password are required")]
    MissingCredentials,

    /// Supplied recovery words are malformed.
    #[error(transparent)]
    Recovery(#[from] RecoveryError),

    /// Supplied recovery words belong to a different vault.
    #[error("recovery words do not match this vault")]
    SeedHashMismatch,

    /// Master key derivation for the document failed.
    #[error(transparent)]
    Kdf(#[from] KdfError),

    /// Recovery words match but the password does not open the document.
    #[error("incorrect password for this exchange document")]
    ReferenceMismatch,
}

/// Cloud compatibility failures detected before merging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Cloud vault was written by a newer schema.
    #[error("cloud vault schema {found} is newer than supported {supported}")]
    NewerVersion { found: u32, supported: u32 },

    /// Cloud vault was encrypted with a different recovery kit or KDF spec.
    #[error("cloud vault encryption does not match the local vault")]
    IncorrectEncryption,

    /// Cloud vault belongs to a different vault id.
    #[error("cloud vault id does not match the local vault")]
    VaultMismatch,

    /// Cloud vault is bound to another device and multi-device sync is off.
    #[error("cloud vault is in use by another device and multi-device sync is disabled")]
    SyncNotAllowed,
}
