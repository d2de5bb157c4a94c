// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM, HMAC-SHA256, and SHA-256 primitives.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG; callers never supply one. Sealed output uses the combined layout
//! `nonce || ciphertext || tag`.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, hmac};
use strongbox_core::{CipherError, SealedBox, SymmetricKey};
use zeroize::Zeroizing;

fn aead_key(key: &SymmetricKey) -> Result<LessSafeKey, CipherError> {
    let unbound =
        UnboundKey::new(&AES_256_GCM, key.expose()).map_err(|_| CipherError::KeyRejected)?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt and authenticate `plaintext`, binding `aad` into the tag.
pub fn seal(key: &SymmetricKey, plaintext: &[u8], aad: &[u8]) -> Result<SealedBox, CipherError> {
    let key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| CipherError::Rng)?;

    let mut in_out = plaintext.to_vec();
    key.seal_in_place_append_tag(
        Nonce::assume_unique_for_key(nonce_bytes),
        Aad::from(aad),
        &mut in_out,
    )
    .map_err(|_| CipherError::AuthenticationFailed)?;

    let mut combined = Vec::with_capacity(NONCE_LEN + in_out.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&in_out);
    Ok(SealedBox::from_bytes(combined))
}

/// Decrypt a [`SealedBox`] produced by [`seal`] with the same `aad`.
///
/// Any bit-level corruption, a wrong key, or a different `aad` yields
/// [`CipherError::AuthenticationFailed`]; no partial plaintext is returned.
pub fn open(
    key: &SymmetricKey,
    sealed: &SealedBox,
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let bytes = sealed.as_bytes();
    if bytes.len() < SealedBox::NONCE_LEN + SealedBox::TAG_LEN {
        return Err(CipherError::MalformedCiphertext);
    }
    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| CipherError::MalformedCiphertext)?;

    let key = aead_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = key
        .open_in_place(nonce, Aad::from(aad), in_out.as_mut_slice())
        .map_err(|_| CipherError::AuthenticationFailed)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}

/// Generate a random 256-bit key.
pub fn random_key() -> Result<SymmetricKey, CipherError> {
    let mut key = Zeroizing::new([0u8; 32]);
    SystemRandom::new()
        .fill(&mut key[..])
        .map_err(|_| CipherError::Rng)?;
    Ok(SymmetricKey::from_bytes(*key))
}

/// Fill `len` bytes from the system CSPRNG.
pub fn random_bytes(len: usize) -> Result<Zeroizing<Vec<u8>>, CipherError> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    SystemRandom::new()
        .fill(bytes.as_mut_slice())
        .map_err(|_| CipherError::Rng)?;
    Ok(bytes)
}

/// HMAC-SHA256 of `message` under `key`.
pub fn hmac_sha256(key: &[u8], message: &[u8]) -> [u8; 32] {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    let tag = hmac::sign(&key, message);
    let mut out = [0u8; 32];
    out.copy_from_slice(tag.as_ref());
    out
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = digest::digest(&digest::SHA256, data);
    let mut out = [0u8; 32];
    out.copy_from_slice(digest.as_ref());
    out
}
