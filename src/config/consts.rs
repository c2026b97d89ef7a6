// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Variable names the call surface uses for its own options.
pub const RESERVED_NAMES: [&str; 2] = ["fetch", "skip_checks"];
/// Display-name prefix of synthesized sink units.
pub const SINK_PREFIX: &str = "sink:";

/// PBKDF2-HMAC-SHA256 rounds used to derive the persistence key.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;
/// Salt used to derive the persistence key when none is configured.
pub const DEFAULT_SALT: &str = "the-dagflow.persistence.v1";
/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;
/// AES-GCM nonce length in bytes; the nonce prefixes the ciphertext.
pub const NONCE_LEN: usize = 12;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}
