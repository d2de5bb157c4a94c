// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every violation instead of failing on the first one.

use crate::diagnostic::ConfigError;
use crate::model::StrongboxConfig;

/// KDF algorithms accepted for new vaults.
pub const KDF_ALGORITHMS: [&str; 3] = ["argon2id", "argon2i", "argon2d"];

/// Entropy sizes that map onto a whole number of recovery words.
pub const ENTROPY_LENGTHS: [usize; 5] = [16, 20, 24, 28, 32];

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &StrongboxConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "logging.level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.logging.level
        ));
    }

    let kdf = &config.kdf;
    if !KDF_ALGORITHMS.contains(&kdf.algorithm.as_str()) {
        fail(format!(
            "kdf.algorithm must be one of {}, got `{}`",
            KDF_ALGORITHMS.join(", "),
            kdf.algorithm
        ));
    }
    if kdf.memory_mb < 64 {
        fail(format!(
            "kdf.memory_mb must be at least 64 for new vaults, got {}",
            kdf.memory_mb
        ));
    }
    if kdf.iterations < 3 {
        fail(format!("kdf.iterations must be at least 3, got {}", kdf.iterations));
    }
    if !(1..=16).contains(&kdf.parallelism) {
        fail(format!(
            "kdf.parallelism must be between 1 and 16, got {}",
            kdf.parallelism
        ));
    }
    if kdf.hash_length != 32 {
        fail(format!("kdf.hash_length must be 32, got {}", kdf.hash_length));
    }

    if !ENTROPY_LENGTHS.contains(&config.recovery.entropy_bytes) {
        fail(format!(
            "recovery.entropy_bytes must be one of 16, 20, 24, 28, 32, got {}",
            config.recovery.entropy_bytes
        ));
    }

    if config.storage.secure_store_path.trim().is_empty() {
        fail("storage.secure_store_path must not be empty".to_string());
    }
    if config.storage.access_group.trim().is_empty() {
        fail("storage.access_group must not be empty".to_string());
    }

    if config.biometry.max_failed_attempts == 0 {
        fail("biometry.max_failed_attempts must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
