// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strongbox integration tests.
//!
//! Provides in-memory capabilities and fixtures for fast, deterministic
//! tests without a platform keychain or biometric sensor.
//!
//! # Components
//!
//! - [`MockBiometry`] - Biometric authenticator with scripted outcomes
//! - [`TestHarness`] - Key vault over an in-memory store with a fast KDF
//! - [`fixtures`] - Sample records, tombstones, and KDF parameters

pub mod fixtures;
pub mod harness;
pub mod mock_biometry;

pub use harness::TestHarness;
pub use mock_biometry::MockBiometry;
