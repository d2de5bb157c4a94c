// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secure store backends for Strongbox key material.
//!
//! [`SqliteSecureStore`] persists slots in a WAL-mode SQLite file with
//! embedded migrations and is safe to share between processes.
//! [`MemorySecureStore`] keeps slots in memory.

pub mod database;
pub mod memory;
pub mod migrations;
pub mod sqlite_store;

pub use database::Database;
pub use memory::MemorySecureStore;
pub use sqlite_store::SqliteSecureStore;
