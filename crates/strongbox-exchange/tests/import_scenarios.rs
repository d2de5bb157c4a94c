// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end import checks with real key derivation and recovery words.

use strongbox_core::{
    CipherError, ImportError, ItemId, KdfError, RecoveryError, SealedBox, Timestamp, VaultId,
};
use strongbox_exchange::codec::{EntryFailure, FailureReason, Section};
use strongbox_exchange::{
    encode, import, ExchangeVault, ExportKeys, ImportCredentials, Login, Origin, VaultState,
};
use strongbox_test_utils::fixtures::fast_kdf_spec;
use strongbox_vault::{derive, entropy_to_words, seed_hash, Entropy, MasterSecret};

const PASSWORD: &str = "correct horse";

struct Exported {
    document: ExchangeVault,
    words: Vec<String>,
    state: VaultState,
}

fn exported_vault(login_count: u8) -> Exported {
    let entropy = Entropy::from_bytes(&[0x5a; 16]).unwrap();
    let words = entropy_to_words(&entropy).unwrap().words().to_vec();
    let vault_id = VaultId::new_v4();
    let spec = fast_kdf_spec();
    let master = derive(&MasterSecret::new(PASSWORD), &entropy, &spec).unwrap();

    let mut state = VaultState::new(vault_id, "Personal");
    for n in 0..login_count {
        let mut login = Login::new(ItemId::new_v4(), Timestamp::from_millis(i64::from(n)));
        login.name = Some(format!("site {n}"));
        login.password = Some(format!("pw-{n}"));
        state.logins.push(login);
    }

    let keys = ExportKeys {
        external_key: master.external_key(vault_id),
        seed_hash: seed_hash(&entropy, vault_id),
        kdf_spec: spec,
    };
    let document = encode(&state, Origin::current("laptop", None), Some(&keys)).unwrap();
    Exported {
        document,
        words,
        state,
    }
}

fn recovery(words: Vec<String>, password: &str) -> ImportCredentials {
    ImportCredentials::Recovery {
        words,
        password: MasterSecret::new(password),
    }
}

#[test]
fn recovery_words_and_password_import_everything() {
    let exported = exported_vault(3);
    let json = exported.document.to_json().unwrap();

    let imported = import(&json, Some(&recovery(exported.words, PASSWORD))).unwrap();
    assert!(imported.encrypted);
    assert!(imported.failures.is_empty());
    assert_eq!(imported.state, exported.state);
}

#[test]
fn newer_schema_fails_before_credentials_are_used() {
    let exported = exported_vault(1);
    let mut value = serde_json::to_value(&exported.document).unwrap();
    value["schemaVersion"] = 3.into();

    let err = import(&value.to_string(), None).unwrap_err();
    assert_eq!(
        err,
        ImportError::UnsupportedSchema {
            found: 3,
            expected: 2
        }
    );
}

#[test]
fn encrypted_document_requires_credentials() {
    let exported = exported_vault(1);
    let json = exported.document.to_json().unwrap();
    assert_eq!(import(&json, None).unwrap_err(), ImportError::MissingCredentials);
}

#[test]
fn words_of_another_vault_fail_on_seed_hash() {
    let exported = exported_vault(1);
    let other = Entropy::from_bytes(&[0x11; 16]).unwrap();
    let other_words = entropy_to_words(&other).unwrap().words().to_vec();
    let json = exported.document.to_json().unwrap();

    // Wrong password as well: the seed hash is checked first.
    let err = import(&json, Some(&recovery(other_words, "nope"))).unwrap_err();
    assert_eq!(err, ImportError::SeedHashMismatch);
}

#[test]
fn malformed_words_surface_the_recovery_error() {
    let exported = exported_vault(1);
    let mut words = exported.words.clone();
    words[4] = "notaword".into();
    let json = exported.document.to_json().unwrap();

    let err = import(&json, Some(&recovery(words, PASSWORD))).unwrap_err();
    assert_eq!(
        err,
        ImportError::Recovery(RecoveryError::UnknownWord { index: 4 })
    );
}

#[test]
fn right_words_wrong_password_is_reference_mismatch() {
    let exported = exported_vault(1);
    let json = exported.document.to_json().unwrap();
    let err = import(&json, Some(&recovery(exported.words, "wrong password"))).unwrap_err();
    assert_eq!(err, ImportError::ReferenceMismatch);
}

#[test]
fn out_of_bounds_kdf_spec_is_rejected() {
    let mut exported = exported_vault(1);
    if let Some(encryption) = exported.document.encryption.as_mut() {
        encryption.kdf_spec.memory_mb = Some(1);
    }
    let json = exported.document.to_json().unwrap();

    let err = import(&json, Some(&recovery(exported.words, PASSWORD))).unwrap_err();
    assert!(matches!(err, ImportError::Kdf(KdfError::InvalidSpec { .. })));
}

#[test]
fn corrupted_entry_is_isolated() {
    let mut exported = exported_vault(3);
    let entries = exported.document.vault.logins_encrypted.as_mut().unwrap();
    let mut bytes = SealedBox::from_base64(&entries[1]).unwrap().into_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    entries[1] = SealedBox::from_bytes(bytes).to_base64();
    let json = exported.document.to_json().unwrap();

    let imported = import(&json, Some(&recovery(exported.words, PASSWORD))).unwrap();
    assert_eq!(
        imported.failures,
        vec![EntryFailure {
            section: Section::Logins,
            index: 1,
            reason: FailureReason::Cipher(CipherError::AuthenticationFailed),
        }]
    );
    let names: Vec<_> = imported
        .state
        .logins
        .iter()
        .map(|l| l.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["site 0", "site 2"]);
}

#[test]
fn invalid_base64_entry_is_isolated() {
    let mut exported = exported_vault(2);
    exported.document.vault.logins_encrypted.as_mut().unwrap()[0] = "***".into();
    let json = exported.document.to_json().unwrap();

    let imported = import(&json, Some(&recovery(exported.words, PASSWORD))).unwrap();
    assert_eq!(imported.state.logins.len(), 1);
    assert_eq!(imported.failures[0].reason, FailureReason::Encoding);
}
