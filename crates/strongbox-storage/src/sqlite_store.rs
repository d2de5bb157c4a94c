// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`SecureStore`].
//!
//! Several processes (the main app and the autofill extension) may open the
//! same file with the same access group. Batches are written in one
//! `BEGIN IMMEDIATE` transaction, so another process sees either all of a
//! batch or none of it.

use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, TransactionBehavior};
use strongbox_config::model::StorageConfig;
use strongbox_core::{KeySlot, SecureStore, StrongboxError};
use tracing::debug;
use zeroize::Zeroizing;

use crate::database::{map_tr_err, Database};

/// Secure store rows for one access group.
pub struct SqliteSecureStore {
    db: Database,
    access_group: String,
}

impl SqliteSecureStore {
    /// Open the store described by the storage configuration.
    pub async fn open(config: &StorageConfig) -> Result<Self, StrongboxError> {
        Self::open_path(
            &config.secure_store_path,
            &config.access_group,
            Duration::from_millis(config.busy_timeout_ms),
        )
        .await
    }

    pub async fn open_path(
        path: &str,
        access_group: &str,
        busy_timeout: Duration,
    ) -> Result<Self, StrongboxError> {
        let db = Database::open(path, busy_timeout).await?;
        debug!(access_group, "secure store opened");
        Ok(Self {
            db,
            access_group: access_group.to_string(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Upsert `entries` in one `BEGIN IMMEDIATE` transaction, first deleting
    /// every row of the access group when `purge` is set.
    async fn write_batch(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
        purge: bool,
    ) -> Result<(), StrongboxError> {
        let group = self.access_group.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                if purge {
                    tx.execute(
                        "DELETE FROM secure_store WHERE access_group = ?1",
                        params![group],
                    )?;
                }
                for (slot, value) in &entries {
                    tx.execute(
                        "INSERT INTO secure_store (access_group, slot, value) VALUES (?1, ?2, ?3)
                         ON CONFLICT (access_group, slot) DO UPDATE SET
                             value = excluded.value,
                             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                        params![group, slot.to_string(), value.as_slice()],
                    )?;
                }
                tx.commit()
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl SecureStore for SqliteSecureStore {
    async fn read(&self, slot: KeySlot) -> Result<Option<Zeroizing<Vec<u8>>>, StrongboxError> {
        let group = self.access_group.clone();
        let value = self
            .db
            .connection()
            .call(move |conn| {
                conn.query_row(
                    "SELECT value FROM secure_store WHERE access_group = ?1 AND slot = ?2",
                    params![group, slot.to_string()],
                    |row| row.get::<_, Vec<u8>>(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)?;
        Ok(value.map(Zeroizing::new))
    }

    async fn save(&self, slot: KeySlot, value: &[u8]) -> Result<(), StrongboxError> {
        self.save_all(vec![(slot, Zeroizing::new(value.to_vec()))])
            .await
    }

    async fn clear(&self, slot: KeySlot) -> Result<(), StrongboxError> {
        let group = self.access_group.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "DELETE FROM secure_store WHERE access_group = ?1 AND slot = ?2",
                    params![group, slot.to_string()],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(%slot, "secure store slot cleared");
        Ok(())
    }

    async fn save_all(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
    ) -> Result<(), StrongboxError> {
        let count = entries.len();
        self.write_batch(entries, false).await?;
        debug!(slots = count, "secure store batch saved");
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), StrongboxError> {
        let group = self.access_group.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                tx.execute(
                    "DELETE FROM secure_store WHERE access_group = ?1",
                    params![group],
                )?;
                tx.commit()
            })
            .await
            .map_err(map_tr_err)?;
        debug!(access_group = %self.access_group, "secure store cleared");
        Ok(())
    }

    async fn replace_all(
        &self,
        entries: Vec<(KeySlot, Zeroizing<Vec<u8>>)>,
    ) -> Result<(), StrongboxError> {
        let count = entries.len();
        self.write_batch(entries, true).await?;
        debug!(access_group = %self.access_group, slots = count, "secure store replaced");
        Ok(())
    }

    fn access_group(&self) -> &str {
        &self.access_group
    }
}
