// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Strongbox configuration.
///
/// Every section is optional and defaults to production values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrongboxConfig {
    /// Log filter settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Key derivation parameters written into new vaults.
    #[serde(default)]
    pub kdf: KdfConfig,

    /// Recovery kit settings.
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Secure store location and sharing.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Software biometry fallback settings.
    #[serde(default)]
    pub biometry: BiometryConfig,

    /// Identity of this device in export metadata.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Cloud merge policy.
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Argon2 parameters for newly created vaults.
///
/// Existing vaults keep the spec they were created with; changing these
/// values only affects vaults created afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KdfConfig {
    /// Argon2 variant: `argon2id`, `argon2i`, or `argon2d`.
    #[serde(default = "default_kdf_algorithm")]
    pub algorithm: String,

    /// Memory cost in MiB (default: 64).
    #[serde(default = "default_kdf_memory_mb")]
    pub memory_mb: u32,

    /// Iteration count (default: 3).
    #[serde(default = "default_kdf_iterations")]
    pub iterations: u32,

    /// Parallelism lanes (default: 4).
    #[serde(default = "default_kdf_parallelism")]
    pub parallelism: u32,

    /// Output length in bytes (default: 32).
    #[serde(default = "default_kdf_hash_length")]
    pub hash_length: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            algorithm: default_kdf_algorithm(),
            memory_mb: default_kdf_memory_mb(),
            iterations: default_kdf_iterations(),
            parallelism: default_kdf_parallelism(),
            hash_length: default_kdf_hash_length(),
        }
    }
}

fn default_kdf_algorithm() -> String {
    "argon2id".to_string()
}

fn default_kdf_memory_mb() -> u32 {
    64
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}

fn default_kdf_hash_length() -> u32 {
    32
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RecoveryConfig {
    /// Entropy generated for new vaults, in bytes (default: 20, i.e. 15 words).
    #[serde(default = "default_entropy_bytes")]
    pub entropy_bytes: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            entropy_bytes: default_entropy_bytes(),
        }
    }
}

fn default_entropy_bytes() -> usize {
    20
}

/// Secure store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite secure store shared by all processes of the group.
    #[serde(default = "default_secure_store_path")]
    pub secure_store_path: String,

    /// Access group scoping every key slot.
    #[serde(default = "default_access_group")]
    pub access_group: String,

    /// How long a writer waits for another process's lock, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            secure_store_path: default_secure_store_path(),
            access_group: default_access_group(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_secure_store_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("strongbox").join("secure-store.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "secure-store.db".to_string())
}

fn default_access_group() -> String {
    "group.strongbox.shared".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BiometryConfig {
    /// Failed checks tolerated before biometry locks out (default: 5).
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,
}

impl Default for BiometryConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed_attempts(),
        }
    }
}

fn default_max_failed_attempts() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Human-readable device name written into export origin metadata.
    #[serde(default = "default_device_name")]
    pub name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: default_device_name(),
        }
    }
}

fn default_device_name() -> String {
    "strongbox".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Allow merging a cloud vault last written by another device, taking it
    /// over for this one (default: false).
    #[serde(default)]
    pub multi_device: bool,
}
