// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Biometric authenticator capability.

use async_trait::async_trait;

use crate::error::BiometryError;
use crate::types::SymmetricKey;

/// Releases the biometry key after a successful biometric check.
///
/// The prompt itself is owned by the platform; `reason` is the text shown to
/// the user. Every error is recoverable by falling back to password entry.
#[async_trait]
pub trait BiometryAuthenticator: Send + Sync + 'static {
    /// Prompts the user and returns the biometry key on success.
    async fn unlock(&self, reason: &str) -> Result<SymmetricKey, BiometryError>;

    /// Reports whether a biometry key is currently enrolled.
    async fn is_enrolled(&self) -> bool;

    /// Clears any failed-attempt lockout after a successful password unlock.
    async fn reset_failures(&self) {}
}
