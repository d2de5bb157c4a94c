// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits implemented outside the vault core.
//!
//! Platform facilities (the shared secure store and the biometric sensor) are
//! injected through these traits so the key vault never depends on a specific
//! platform security API. Both use `#[async_trait]` for dynamic dispatch.

pub mod biometry;
pub mod secure_store;

pub use biometry::BiometryAuthenticator;
pub use secure_store::SecureStore;
