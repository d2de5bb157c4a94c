// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process [`SecureStore`] for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use strongbox_core::{KeySlot, SecureStore, StrongboxError};
use zeroize::Zeroizing;

pub struct MemorySecureStore {
    access_group: String,
    slots: Mutex<HashMap<KeySlot, Zeroizing<Vec<u8>>>>,
}

impl MemorySecureStore {
    pub fn new(access_group: impl Into<String>) -> Self {
        Self {
            access_group: access_group.into(),
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<KeySlot, Zeroizing<Vec<u8>>>>, StrongboxError>
    {
        self.slots
            .lock()
            .map_err(|_| StrongboxError::Internal("secure store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SecureStore for MemorySecureStore {
    async fn read(&self, slot: KeySlot) -> Result<Option<Zeroizing<Vec<u8>>>, StrongboxError> {
        Ok(self.slots()?.get(&slot).cloned())
    }

    async fn save(&self, slot: KeySlot, value: &[u8]) -> Result<(), StrongboxError> {
        self.slots()?.insert(slot, Zeroizing::new(value.to_vec()));
        Ok(())
    }

    async fn clear(&self, slot: KeySlot) -> Result<(), StrongboxError> {
        self.slots()?.remove(&slot);
        Ok(())
    }

    async fn save_all(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
    ) -> Result<(), StrongboxError> {
        self.slots()?.extend(entries);
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StrongboxError> {
        self.slots()?.clear();
        Ok(())
    }

    async fn replace_all(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
    ) -> Result<(), StrongboxError> {
        let mut slots = self.slots()?;
        slots.clear();
        slots.extend(entries);
        Ok(())
    }

    fn access_group(&self) -> &str {
        &self.access_group
    }
}
