// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock biometric authenticator for deterministic testing.
//!
//! `MockBiometry` releases the biometry key held in a [`SecureStore`] the
//! way a platform sensor would, but the outcome of each prompt is taken from
//! a pre-configured queue.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use strongbox_core::{BiometryAuthenticator, BiometryError, KeySlot, SecureStore, SymmetricKey};
use tokio::sync::Mutex;

/// A biometric authenticator whose prompts succeed or fail on script.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty every
/// prompt succeeds.
pub struct MockBiometry {
    store: Arc<dyn SecureStore>,
    outcomes: Mutex<VecDeque<Result<(), BiometryError>>>,
    prompts: Mutex<Vec<String>>,
    resets: Mutex<u32>,
}

impl MockBiometry {
    pub fn new(store: Arc<dyn SecureStore>) -> Self {
        Self {
            store,
            outcomes: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            resets: Mutex::new(0),
        }
    }

    /// Queue the outcome of the next prompt.
    pub async fn push_outcome(&self, outcome: Result<(), BiometryError>) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Reasons shown for every prompt so far, oldest first.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// How many times a password unlock cleared the failure counter.
    pub async fn resets(&self) -> u32 {
        *self.resets.lock().await
    }
}

#[async_trait]
impl BiometryAuthenticator for MockBiometry {
    async fn unlock(&self, reason: &str) -> Result<SymmetricKey, BiometryError> {
        self.prompts.lock().await.push(reason.to_string());
        if let Some(Err(e)) = self.outcomes.lock().await.pop_front() {
            return Err(e);
        }
        match self.store.read(KeySlot::BiometryKey).await {
            Ok(Some(raw)) => SymmetricKey::try_from_slice(&raw).ok_or(BiometryError::Unavailable),
            Ok(None) => Err(BiometryError::NotEnrolled),
            Err(_) => Err(BiometryError::Unavailable),
        }
    }

    async fn is_enrolled(&self) -> bool {
        matches!(self.store.read(KeySlot::BiometryKey).await, Ok(Some(_)))
    }

    async fn reset_failures(&self) {
        *self.resets.lock().await += 1;
    }
}
