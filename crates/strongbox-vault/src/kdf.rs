// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2 master-key derivation.
//!
//! The master key is Argon2 (version 0x13) over `SHA256(entropy) || NFKD(secret)`
//! with a salt taken from the vault's trailing recovery words, so the same
//! secret yields unrelated keys for different vaults. Parameters travel with
//! the vault as a [`KdfSpec`] and are validated before any memory is reserved.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strongbox_config::model::KdfConfig;
use strongbox_core::{KdfError, StrongboxError, SymmetricKey};
use strum::{Display, EnumString};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::keys::MasterKey;
use crate::recovery::{self, Entropy};

/// Smallest memory cost the engine accepts. New vaults are held to the
/// higher floor in config validation.
pub const MIN_MEMORY_MB: u32 = 8;
pub const MAX_MEMORY_MB: u32 = 4096;
pub const MAX_ITERATIONS: u32 = 64;
pub const MAX_PARALLELISM: u32 = 16;
pub const HASH_LENGTH: u32 = 32;

/// Argon2 variant. Closed set; unknown names are rejected at parse time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum KdfAlgorithm {
    #[default]
    Argon2id,
    Argon2i,
    Argon2d,
}

impl From<KdfAlgorithm> for argon2::Algorithm {
    fn from(algorithm: KdfAlgorithm) -> Self {
        match algorithm {
            KdfAlgorithm::Argon2id => argon2::Algorithm::Argon2id,
            KdfAlgorithm::Argon2i => argon2::Algorithm::Argon2i,
            KdfAlgorithm::Argon2d => argon2::Algorithm::Argon2d,
        }
    }
}

/// Parameters used to derive a vault's master key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfSpec {
    #[serde(rename = "type")]
    pub algorithm: KdfAlgorithm,
    pub hash_length: u32,
    pub memory_mb: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfSpec {
    fn default() -> Self {
        Self {
            algorithm: KdfAlgorithm::Argon2id,
            hash_length: HASH_LENGTH,
            memory_mb: 64,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfSpec {
    /// Build a spec from configuration, rejecting unknown algorithm names.
    pub fn from_config(config: &KdfConfig) -> Result<Self, KdfError> {
        let algorithm = config
            .algorithm
            .parse::<KdfAlgorithm>()
            .map_err(|_| KdfError::InvalidSpec {
                reason: format!("unknown algorithm `{}`", config.algorithm),
            })?;
        let spec = Self {
            algorithm,
            hash_length: config.hash_length,
            memory_mb: config.memory_mb,
            iterations: config.iterations,
            parallelism: config.parallelism,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check every parameter against the engine bounds.
    pub fn validate(&self) -> Result<(), KdfError> {
        let invalid = |reason: String| Err(KdfError::InvalidSpec { reason });

        if self.hash_length != HASH_LENGTH {
            return invalid(format!(
                "hash length must be {HASH_LENGTH}, got {}",
                self.hash_length
            ));
        }
        if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&self.memory_mb) {
            return invalid(format!(
                "memory must be between {MIN_MEMORY_MB} and {MAX_MEMORY_MB} MiB, got {}",
                self.memory_mb
            ));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return invalid(format!(
                "iterations must be between 1 and {MAX_ITERATIONS}, got {}",
                self.iterations
            ));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return invalid(format!(
                "parallelism must be between 1 and {MAX_PARALLELISM}, got {}",
                self.parallelism
            ));
        }
        Ok(())
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_mb * 1024
    }
}

/// The user's master password. Never logged, never printed.
pub struct MasterSecret(SecretString);

impl MasterSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    /// The secret in Unicode compatibility decomposition (NFKD).
    fn normalized(&self) -> Zeroizing<String> {
        Zeroizing::new(self.0.expose_secret().nfkd().collect())
    }
}

impl From<SecretString> for MasterSecret {
    fn from(secret: SecretString) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret([REDACTED])")
    }
}

/// Derive a vault's master key from its entropy and the master secret.
///
/// Deterministic: the same inputs always give the same key. CPU and memory
/// heavy; async callers should use [`derive_in_background`].
pub fn derive(
    secret: &MasterSecret,
    entropy: &Entropy,
    spec: &KdfSpec,
) -> Result<MasterKey, KdfError> {
    spec.validate()?;
    let salt = recovery::salt_for(entropy).map_err(|e| KdfError::InvalidSpec {
        reason: e.to_string(),
    })?;

    let normalized = secret.normalized();
    let mut password = Zeroizing::new(Vec::with_capacity(32 + normalized.len()));
    password.extend_from_slice(entropy.seed().as_ref());
    password.extend_from_slice(normalized.as_bytes());

    let key = derive_raw(&password, &salt, spec)?;
    debug!(
        algorithm = %spec.algorithm,
        memory_mb = spec.memory_mb,
        iterations = spec.iterations,
        "master key derived"
    );
    Ok(MasterKey::new(SymmetricKey::from_bytes(*key)))
}

/// Run Argon2 over raw password bytes with the given salt.
///
/// The working memory is reserved fallibly, so a device that cannot satisfy
/// `memory_mb` gets [`KdfError::AllocationFailure`] instead of an abort.
pub fn derive_raw(
    password: &[u8],
    salt: &[u8],
    spec: &KdfSpec,
) -> Result<Zeroizing<[u8; 32]>, KdfError> {
    spec.validate()?;
    let params = argon2::Params::new(
        spec.memory_kib(),
        spec.iterations,
        spec.parallelism,
        Some(spec.hash_length as usize),
    )
    .map_err(|e| KdfError::InvalidSpec {
        reason: e.to_string(),
    })?;
    let block_count = params.block_count();
    let argon2 = argon2::Argon2::new(spec.algorithm.into(), argon2::Version::V0x13, params);

    let mut blocks: Vec<argon2::Block> = Vec::new();
    blocks
        .try_reserve_exact(block_count)
        .map_err(|_| KdfError::AllocationFailure {
            memory_mb: spec.memory_mb,
        })?;
    blocks.resize(block_count, argon2::Block::default());

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into_with_memory(password, salt, &mut output[..], blocks.as_mut_slice())
        .map_err(|e| KdfError::InvalidSpec {
            reason: e.to_string(),
        })?;
    Ok(output)
}

/// [`derive`] on the blocking thread pool.
pub async fn derive_in_background(
    secret: MasterSecret,
    entropy: Entropy,
    spec: KdfSpec,
) -> Result<MasterKey, StrongboxError> {
    tokio::task::spawn_blocking(move || derive(&secret, &entropy, &spec))
        .await
        .map_err(|e| StrongboxError::Internal(format!("key derivation task failed: {e}")))?
        .map_err(StrongboxError::from)
}
