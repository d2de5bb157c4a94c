// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure key-value store shared by the main process and the autofill extension.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::error::StrongboxError;
use crate::types::KeySlot;

/// Storage for key material, scoped to one access group.
///
/// Implementations must be atomic with respect to concurrent access from
/// another process sharing the same access group: a reader never observes a
/// partially applied [`save_all`](SecureStore::save_all),
/// [`clear_all`](SecureStore::clear_all) or
/// [`replace_all`](SecureStore::replace_all).
#[async_trait]
pub trait SecureStore: Send + Sync + 'static {
    /// Reads the value stored in `slot`, or `None` if the slot is empty.
    async fn read(&self, slot: KeySlot) -> Result<Option<Zeroizing<Vec<u8>>>, StrongboxError>;

    /// Stores `value` in `slot`, replacing any previous value.
    async fn save(&self, slot: KeySlot, value: &[u8]) -> Result<(), StrongboxError>;

    /// Empties `slot`. Clearing an empty slot is not an error.
    async fn clear(&self, slot: KeySlot) -> Result<(), StrongboxError>;

    /// Stores several slots as one atomic batch.
    async fn save_all(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
    ) -> Result<(), StrongboxError>;

    /// Empties every slot of the access group as one atomic batch.
    async fn clear_all(&self) -> Result<(), StrongboxError>;

    /// Empties the access group and stores `entries` in the same atomic
    /// batch. On failure the previous contents are left untouched.
    async fn replace_all(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
    ) -> Result<(), StrongboxError>;

    /// Returns the access group this store is scoped to.
    fn access_group(&self) -> &str;
}
