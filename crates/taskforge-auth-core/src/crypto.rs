//! Cryptographic utilities for opaque tokens
//!
//! Session ids and one-time tokens must be unguessable; both are 256 bits of
//! CSPRNG output, base64url-encoded. Tokens held in server-side maps are
//! stored by digest so a memory dump never yields usable token values.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Raw entropy per opaque token (256 bits)
pub const OPAQUE_TOKEN_BYTES: usize = 32;

/// Generate an unguessable opaque token
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; OPAQUE_TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 digest of a token, hex-encoded, for server-side storage
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
