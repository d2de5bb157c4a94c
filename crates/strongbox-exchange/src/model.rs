// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plaintext vault contents carried by an exchange document.
//!
//! [`Login`] and [`Tag`] are also the plaintext that item records seal, so an
//! item decrypted from the local vault can be exported without conversion.

use std::fmt;

use serde::{Deserialize, Serialize};
use strongbox_core::{DeletedItemData, ItemId, ProtectionLevel, Timestamp, VaultId};

/// A URI attached to a login, with its autofill match rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUri {
    pub text: String,
    /// 0 domain, 1 host, 2 starts with, 3 exact.
    pub matcher: u8,
}

/// One saved login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// [`ProtectionLevel`] code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<LoginUri>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ItemId>,
}

impl Login {
    /// A login with only its identity and timestamps set.
    pub fn new(id: ItemId, created_at: Timestamp) -> Self {
        Self {
            id,
            name: None,
            username: None,
            password: None,
            notes: None,
            security_type: None,
            icon_type: None,
            icon_uri_index: None,
            label_text: None,
            label_color: None,
            custom_image_url: None,
            created_at,
            updated_at: created_at,
            uris: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Unknown or missing codes fall back to [`ProtectionLevel::Normal`].
    pub fn protection_level(&self) -> ProtectionLevel {
        self.security_type
            .and_then(ProtectionLevel::from_code)
            .unwrap_or_default()
    }
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Login")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .field("security_type", &self.security_type)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .field("uris", &self.uris.len())
            .field("tags", &self.tags)
            .finish_non_exhaustive()
    }
}

/// A user-defined tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub position: u32,
    pub updated_at: Timestamp,
}

/// Everything an exchange document describes, in plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultState {
    pub vault_id: VaultId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub logins: Vec<Login>,
    pub tags: Vec<Tag>,
    pub deleted: Vec<DeletedItemData>,
}

impl VaultState {
    pub fn new(vault_id: VaultId, name: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            vault_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
            logins: Vec::new(),
            tags: Vec::new(),
            deleted: Vec::new(),
        }
    }
}
