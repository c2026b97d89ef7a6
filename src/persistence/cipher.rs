// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Password-based encryption of saved graphs.
//!
//! Key: PBKDF2-HMAC-SHA256 over the password. Layout: `nonce || ciphertext`
//! with a fresh random AES-GCM nonce per save.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::{Digest, Sha256};

use crate::config::consts::{KEY_LEN, NONCE_LEN};
use crate::config::PersistenceOptions;
use crate::errors::PersistenceError;

fn derive_key(password: &str, options: &PersistenceOptions) -> Result<[u8; KEY_LEN], PersistenceError> {
    if options.iterations == 0 {
        return Err(PersistenceError::KeyDerivation(
            "iteration count must be at least 1".to_string(),
        ));
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        options.salt.as_bytes(),
        options.iterations,
        &mut key,
    );
    Ok(key)
}

pub fn encrypt(
    plaintext: &[u8],
    password: &str,
    options: &PersistenceOptions,
) -> Result<Vec<u8>, PersistenceError> {
    let key = derive_key(password, options)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| PersistenceError::Encryption)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

pub fn decrypt(
    blob: &[u8],
    password: &str,
    options: &PersistenceOptions,
) -> Result<Vec<u8>, PersistenceError> {
    if blob.len() < NONCE_LEN {
        return Err(PersistenceError::Decryption);
    }

    let key = derive_key(password, options)?;
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
    let (nonce, ciphertext) = blob.split_at(NONCE_LEN);

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| PersistenceError::Decryption)
}

/// Lowercase hex SHA-256.
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
