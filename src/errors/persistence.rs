// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::errors::BuildError;

/// Errors from saving or loading a graph. No partial state is ever returned.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Failed to decrypt graph: wrong password or corrupted data")]
    Decryption,

    #[error("Failed to encrypt graph")]
    Encryption,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unit '{unit}' has kind '{kind}' which is not registered")]
    UnknownUnitKind { unit: String, kind: String },

    #[error("Unit '{unit}' could not be restored from its saved state: {reason}")]
    InvalidUnitState { unit: String, reason: String },

    #[error("Saved graph could not be rebuilt: {0}")]
    Build(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
