// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Software fallback for biometric unlock.
//!
//! Releases the biometry key from the secure store after an injected
//! presence check. Used on hosts without a biometric sensor and in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use strongbox_core::{BiometryAuthenticator, BiometryError, KeySlot, SecureStore, SymmetricKey};
use tracing::{debug, warn};

/// Outcome of one presence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Confirmed,
    /// The user dismissed the prompt.
    Declined,
    /// The check ran but did not match.
    Failed,
}

/// Asks the user to prove presence. Injected from outside the core.
pub trait PresenceCheck: Send + Sync + 'static {
    fn check(&self, reason: &str) -> Presence;
}

impl<F> PresenceCheck for F
where
    F: Fn(&str) -> Presence + Send + Sync + 'static,
{
    fn check(&self, reason: &str) -> Presence {
        self(reason)
    }
}

pub struct SoftwareBiometry {
    store: Arc<dyn SecureStore>,
    presence: Box<dyn PresenceCheck>,
    failed_attempts: AtomicU32,
    max_failed_attempts: u32,
}

impl SoftwareBiometry {
    pub fn new(
        store: Arc<dyn SecureStore>,
        presence: impl PresenceCheck,
        max_failed_attempts: u32,
    ) -> Self {
        Self {
            store,
            presence: Box::new(presence),
            failed_attempts: AtomicU32::new(0),
            max_failed_attempts: max_failed_attempts.max(1),
        }
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts.load(Ordering::SeqCst)
    }

    fn is_locked_out(&self) -> bool {
        self.failed_attempts() >= self.max_failed_attempts
    }
}

#[async_trait]
impl BiometryAuthenticator for SoftwareBiometry {
    async fn unlock(&self, reason: &str) -> Result<SymmetricKey, BiometryError> {
        if !self.is_enrolled().await {
            return Err(BiometryError::NotEnrolled);
        }

        // Failed matches re-prompt until the lockout threshold.
        loop {
            if self.is_locked_out() {
                warn!("biometric unlock locked out");
                return Err(BiometryError::LockedOut);
            }
            match self.presence.check(reason) {
                Presence::Confirmed => break,
                Presence::Declined => return Err(BiometryError::UserCancelled),
                Presence::Failed => {
                    let attempts = self.failed_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!(attempts, "biometric check failed");
                }
            }
        }

        self.failed_attempts.store(0, Ordering::SeqCst);
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
        self.failed_attempts.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use strongbox_storage::MemorySecureStore;

    async fn enrolled_store() -> Arc<dyn SecureStore> {
        let store: Arc<dyn SecureStore> = Arc::new(MemorySecureStore::new("group.test"));
        store.save(KeySlot::BiometryKey, &[9u8; 32]).await.unwrap();
        store
    }

    /// Plays back a fixed sequence of outcomes, then confirms.
    fn scripted(outcomes: Vec<Presence>) -> impl PresenceCheck {
        let queue = Mutex::new(outcomes.into_iter());
        move |_: &str| queue.lock().unwrap().next().unwrap_or(Presence::Confirmed)
    }

    #[tokio::test]
    async fn confirmed_presence_releases_key() {
        let biometry = SoftwareBiometry::new(enrolled_store().await, |_: &str| Presence::Confirmed, 3);
        let key = biometry.unlock("unlock").await.unwrap();
        assert_eq!(key.expose(), &[9u8; 32]);
    }

    #[tokio::test]
    async fn declined_prompt_is_user_cancelled() {
        let biometry = SoftwareBiometry::new(enrolled_store().await, |_: &str| Presence::Declined, 3);
        assert_eq!(biometry.unlock("unlock").await.unwrap_err(), BiometryError::UserCancelled);
    }

    #[tokio::test]
    async fn empty_slot_is_not_enrolled() {
        let store: Arc<dyn SecureStore> = Arc::new(MemorySecureStore::new("group.test"));
        let biometry = SoftwareBiometry::new(store, |_: &str| Presence::Confirmed, 3);
        assert!(!biometry.is_enrolled().await);
        assert_eq!(biometry.unlock("unlock").await.unwrap_err(), BiometryError::NotEnrolled);
    }

    #[tokio::test]
    async fn failures_below_threshold_retry_then_succeed() {
        let biometry = SoftwareBiometry::new(
            enrolled_store().await,
            scripted(vec![Presence::Failed, Presence::Failed]),
            3,
        );
        assert!(biometry.unlock("unlock").await.is_ok());
        assert_eq!(biometry.failed_attempts(), 0);
    }

    #[tokio::test]
    async fn repeated_failures_lock_out_until_reset() {
        let biometry = SoftwareBiometry::new(enrolled_store().await, |_: &str| Presence::Failed, 3);
        assert_eq!(biometry.unlock("unlock").await.unwrap_err(), BiometryError::LockedOut);
        assert_eq!(biometry.failed_attempts(), 3);

        // Still locked out on the next call without prompting.
        assert_eq!(biometry.unlock("unlock").await.unwrap_err(), BiometryError::LockedOut);

        biometry.reset_failures().await;
        assert_eq!(biometry.failed_attempts(), 0);
    }

    #[tokio::test]
    async fn prompt_receives_reason() {
        let seen = Arc::new(Mutex::new(String::new()));
        let captured = seen.clone();
        let biometry = SoftwareBiometry::new(
            enrolled_store().await,
            move |reason: &str| {
                *captured.lock().unwrap() = reason.to_string();
                Presence::Confirmed
            },
            3,
        );
        biometry.unlock("Unlock Strongbox").await.unwrap();
        assert_eq!(*seen.lock().unwrap(), "Unlock Strongbox");
    }
}
