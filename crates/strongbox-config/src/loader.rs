// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered config loading with Figment.
//!
//! Lookup order: `/etc/strongbox/strongbox.toml`, then
//! `~/.config/strongbox/strongbox.toml`, then `./strongbox.toml`, then
//! `STRONGBOX_*` environment variables. Later layers win.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StrongboxConfig;

/// Config sections that env var names are split on.
const SECTIONS: [&str; 7] = [
    "logging", "kdf", "recovery", "storage", "biometry", "device", "sync",
];

/// Paths of every TOML layer, lowest precedence first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/strongbox/strongbox.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("strongbox/strongbox.toml"));
    }
    paths.push(PathBuf::from("strongbox.toml"));
    paths
}

/// Build the full layered Figment without extracting it.
pub fn build_figment() -> Figment {
    config_paths()
        .into_iter()
        .fold(defaults(), |figment, path| figment.merge(Toml::file(path)))
        .merge(env_provider())
}

/// Load configuration from every layer.
pub fn load_config() -> Result<StrongboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<StrongboxConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

/// Load configuration from one explicit file plus env overrides.
pub fn load_config_from_path(path: &Path) -> Result<StrongboxConfig, figment::Error> {
    defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(StrongboxConfig::default()))
}

/// Map `STRONGBOX_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `STRONGBOX_STORAGE_SECURE_STORE_PATH` maps to `storage.secure_store_path`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("STRONGBOX_").map(|key| {
        let key = key.as_str();
        SECTIONS
            .iter()
            .find_map(|section| {
                key.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| key.to_string())
            .into()
    })
}
