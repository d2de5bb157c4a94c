// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox application layer.
//!
//! Wires the key vault, item cipher, merge engine and exchange codec behind
//! [`VaultInteractor`], which is what the `strongbox` binary and any other
//! front end call into.

pub mod descriptor;
pub mod interactor;

pub use descriptor::{descriptor_path, load_descriptor, remove_descriptor, save_descriptor};
pub use interactor::{VaultInteractor, CLOUD_SCHEMA_VERSION};
