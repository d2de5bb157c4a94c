// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic local/cloud merge engine for Strongbox vaults.
//!
//! [`merge`] compares two [`Snapshot`]s record by record and returns a
//! [`MergePlan`] of writes for each side. It performs no I/O; fetching cloud
//! records and persisting writes belong to the caller.

pub mod compat;
pub mod merge;
pub mod plan;
pub mod snapshot;

pub use compat::{check_cloud_vault, VaultHeader, SUPPORTED_CLOUD_SCHEMA};
pub use merge::{merge, merge_cloud};
pub use plan::{CloudMerge, MergePlan, WriteOp};
pub use snapshot::{RecordKey, RecordState, Snapshot};
