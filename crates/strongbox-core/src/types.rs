// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common domain types shared by the vault, sync, and exchange crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use zeroize::Zeroizing;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Always lowercase hyphenated; key derivation depends on it.
                write!(f, "{}", self.0.as_hyphenated())
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Identifies one vault; part of every derived key's domain.
    VaultId
);
uuid_id!(
    /// Identifies one item or tag inside a vault.
    ItemId
);
uuid_id!(
    /// Identifies the device that owns the local copy of a vault.
    DeviceId
);

/// Milliseconds since the Unix epoch.
///
/// Millisecond precision matches the exchange format, so timestamps survive an
/// export/import cycle unchanged and merge comparisons agree across devices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Convert to a chrono UTC datetime, if representable.
    pub fn to_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Per-item protection level, stored unencrypted so it is visible before unlock.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProtectionLevel {
    /// Decrypts after a regular unlock.
    #[default]
    Normal,
    /// Requires an explicit confirmation before revealing.
    Confirm,
    /// Requires recent re-authentication; sealed under the secure key.
    TopSecret,
}

impl ProtectionLevel {
    /// Numeric code used by the exchange format.
    pub fn code(&self) -> u8 {
        match self {
            Self::TopSecret => 0,
            Self::Confirm => 1,
            Self::Normal => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::TopSecret),
            1 => Some(Self::Confirm),
            2 => Some(Self::Normal),
            _ => None,
        }
    }
}

/// Kind of a vault record. Tags are synchronized exactly like items.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Login,
    Tag,
}

/// What an item record's sealed content holds.
///
/// Stored unencrypted next to the payload. Types this build does not know
/// keep their raw name so they survive a merge unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemContentType {
    #[default]
    Login,
    SecureNote,
    Unknown(String),
}

impl ItemContentType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::SecureNote => "secureNote",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "login" => Self::Login,
            "secureNote" => Self::SecureNote,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ItemContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ItemContentType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ItemContentType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_raw(&raw))
    }
}

/// Named slots of the secure store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum KeySlot {
    /// Master key wrapped by the biometry key.
    MasterKey,
    /// Key that unwraps the master key after a successful biometric check.
    BiometryKey,
    /// Device-bound key that wraps entropy and the encryption reference.
    AppKey,
    /// Device id sealed under the master key, then under the app key.
    EncryptionReference,
    /// Vault entropy wrapped by the app key.
    Entropy,
}

impl KeySlot {
    pub const ALL: [KeySlot; 5] = [
        KeySlot::MasterKey,
        KeySlot::BiometryKey,
        KeySlot::AppKey,
        KeySlot::EncryptionReference,
        KeySlot::Entropy,
    ];
}

/// A 256-bit symmetric key, zeroed on drop.
///
/// Debug output intentionally omits the key bytes.
#[derive(Clone)]
pub struct SymmetricKey(Zeroizing<[u8; 32]>);

impl SymmetricKey {
    pub const LEN: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Build a key from a slice; `None` unless it is exactly 32 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 32] = bytes.try_into().ok()?;
        Some(Self::from_bytes(array))
    }

    pub fn expose(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        // No early exit on the first differing byte.
        self.0.iter().zip(other.0.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b)) == 0
    }
}

impl Eq for SymmetricKey {}

/// An AEAD output in combined form: `nonce || ciphertext || tag`.
///
/// Serialized as standard base64.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SealedBox(Vec<u8>);

impl SealedBox {
    pub const NONCE_LEN: usize = 12;
    pub const TAG_LEN: usize = 16;

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map(Self)
    }
}

impl Serialize for SealedBox {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for SealedBox {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// One encrypted vault record plus its unencrypted routing metadata.
///
/// Records are superseded, never mutated: an edit produces a new payload with
/// a newer `modified_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEncryptedData {
    pub item_id: ItemId,
    pub vault_id: VaultId,
    pub kind: ItemKind,
    /// Content type of an item. Tag records leave it at the default.
    #[serde(default)]
    pub content_type: ItemContentType,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    #[serde(default)]
    pub protection_level: ProtectionLevel,
    #[serde(default)]
    pub tag_ids: Vec<ItemId>,
    pub content: SealedBox,
}

/// Deletion marker kept so merge can tell "deleted" from "never existed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedItemData {
    pub item_id: ItemId,
    pub vault_id: VaultId,
    pub kind: ItemKind,
    pub deleted_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_lowercase_hyphenated() {
        let id: VaultId = "A1B2C3D4-0000-4000-8000-00000000000F".parse().unwrap();
        assert_eq!(id.to_string(), "a1b2c3d4-0000-4000-8000-00000000000f");
    }

    #[test]
    fn protection_level_codes_round_trip() {
        for level in [
            ProtectionLevel::Normal,
            ProtectionLevel::Confirm,
            ProtectionLevel::TopSecret,
        ] {
            assert_eq!(ProtectionLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(ProtectionLevel::from_code(9), None);
    }

    #[test]
    fn key_slot_names_are_snake_case() {
        assert_eq!(KeySlot::MasterKey.to_string(), "master_key");
        assert_eq!(KeySlot::EncryptionReference.to_string(), "encryption_reference");
        assert_eq!(KeySlot::ALL.len(), 5);
    }

    #[test]
    fn symmetric_key_debug_is_redacted() {
        let key = SymmetricKey::from_bytes([7u8; 32]);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('7'));
    }

    #[test]
    fn symmetric_key_rejects_wrong_length() {
        assert!(SymmetricKey::try_from_slice(&[0u8; 16]).is_none());
        assert!(SymmetricKey::try_from_slice(&[0u8; 32]).is_some());
    }

    #[test]
    fn item_encrypted_data_serializes_content_as_base64() {
        let data = ItemEncryptedData {
            item_id: ItemId::new_v4(),
            vault_id: VaultId::new_v4(),
            kind: ItemKind::Login,
            content_type: ItemContentType::SecureNote,
            created_at: Timestamp::from_millis(1_700_000_000_000),
            modified_at: Timestamp::from_millis(1_700_000_000_500),
            protection_level: ProtectionLevel::Confirm,
            tag_ids: vec![],
            content: SealedBox::from_bytes(vec![1, 2, 3]),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["content"], "AQID");
        assert_eq!(json["kind"], "login");
        assert_eq!(json["contentType"], "secureNote");
        assert_eq!(json["protectionLevel"], "confirm");
        assert_eq!(json["modifiedAt"], 1_700_000_000_500i64);

        let back: ItemEncryptedData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn unknown_content_type_passes_through() {
        let parsed: ItemContentType = serde_json::from_str("\"paymentCard\"").unwrap();
        assert_eq!(parsed, ItemContentType::Unknown("paymentCard".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"paymentCard\"");
        assert_eq!(ItemContentType::from_raw("login"), ItemContentType::Login);
    }

    #[test]
    fn content_type_defaults_to_login_when_missing() {
        let json = serde_json::json!({
            "itemId": ItemId::new_v4(),
            "vaultId": VaultId::new_v4(),
            "kind": "login",
            "createdAt": 1,
            "modifiedAt": 2,
            "content": "AQID",
        });
        let data: ItemEncryptedData = serde_json::from_value(json).unwrap();
        assert_eq!(data.content_type, ItemContentType::Login);
    }

    #[test]
    fn timestamp_displays_as_rfc3339() {
        let ts = Timestamp::from_millis(0);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00.000Z");
    }
}
