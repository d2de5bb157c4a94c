// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for key vault integration testing.
//!
//! `TestHarness` assembles a [`KeyVault`] over an in-memory secure store and
//! a [`MockBiometry`], using the cheapest KDF parameters the engine accepts.

use std::sync::Arc;

use strongbox_core::{SecureStore, StrongboxError};
use strongbox_storage::MemorySecureStore;
use strongbox_vault::{KeyVault, MasterSecret, RecoveryWords, VaultDescriptor};

use crate::fixtures::fast_descriptor;
use crate::mock_biometry::MockBiometry;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    access_group: String,
    password: Option<String>,
    entropy_bytes: usize,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            access_group: "group.test".to_string(),
            password: None,
            entropy_bytes: 16,
        }
    }

    /// Scope the in-memory store to a different access group.
    pub fn with_access_group(mut self, group: &str) -> Self {
        self.access_group = group.to_string();
        self
    }

    /// Create the vault during `build`, unlocked with this password.
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Entropy length for a vault created during `build`.
    pub fn with_entropy_bytes(mut self, len: usize) -> Self {
        self.entropy_bytes = len;
        self
    }

    /// Build the harness, creating the vault if a password was set.
    pub async fn build(self) -> Result<TestHarness, StrongboxError> {
        let store: Arc<dyn SecureStore> = Arc::new(MemorySecureStore::new(&self.access_group));
        let biometry = Arc::new(MockBiometry::new(store.clone()));
        let vault = KeyVault::new(store.clone(), biometry.clone());
        let descriptor = fast_descriptor();

        let words = match self.password {
            Some(password) => Some(
                vault
                    .create(MasterSecret::new(password), &descriptor, self.entropy_bytes)
                    .await?,
            ),
            None => None,
        };

        Ok(TestHarness {
            store,
            biometry,
            vault,
            descriptor,
            words,
        })
    }
}

/// A key vault wired to in-memory capabilities.
pub struct TestHarness {
    pub store: Arc<dyn SecureStore>,
    pub biometry: Arc<MockBiometry>,
    pub vault: KeyVault,
    pub descriptor: VaultDescriptor,
    /// Recovery words of a vault created by the builder.
    pub words: Option<RecoveryWords>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// An empty vault with no slots written.
    pub async fn empty() -> Result<Self, StrongboxError> {
        Self::builder().build().await
    }

    /// A vault created and unlocked with `password`.
    pub async fn unlocked(password: &str) -> Result<Self, StrongboxError> {
        Self::builder().with_password(password).build().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_harness_has_no_vault() {
        let harness = TestHarness::empty().await.unwrap();
        assert!(!harness.vault.exists().await.unwrap());
        assert!(harness.words.is_none());
    }

    #[tokio::test]
    async fn unlocked_harness_holds_a_session() {
        let harness = TestHarness::builder()
            .with_password("pw")
            .with_entropy_bytes(32)
            .build()
            .await
            .unwrap();
        assert!(harness.vault.is_unlocked().await);
        assert_eq!(harness.words.as_ref().map(|w| w.len()), Some(24));
    }
}
