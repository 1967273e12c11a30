//! Token revocation set
//!
//! Tokens invalidated before their natural expiry (logout) land here.
//! Entries carry the token's own expiry and evict themselves once it
//! passes, so the set never outgrows the population of live tokens.
//! A revoked token that has since expired reports not-revoked; the codec
//! rejects it as expired anyway.

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

use crate::crypto::token_digest;

/// Evict each entry when the revoked token's own expiry passes
struct RevocationExpiry;

impl Expiry<String, DateTime<Utc>> for RevocationExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        expires_at: &DateTime<Utc>,
        _created_at: Instant,
    ) -> Option<Duration> {
        let remaining = (*expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        Some(remaining)
    }
}

/// Process-wide revocation set for tokens invalidated before expiry
pub struct TokenBlacklist {
    entries: Cache<String, DateTime<Utc>>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().expire_after(RevocationExpiry).build(),
        }
    }

    /// Revoke a token until its own expiry
    ///
    /// Idempotent; only the token's digest is retained.
    pub fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        self.entries.insert(token_digest(token), expires_at);
    }

    /// Check whether a token is currently revoked
    pub fn is_revoked(&self, token: &str) -> bool {
        match self.entries.get(&token_digest(token)) {
            // Lazy expiry check in case eviction has not run yet
            Some(expires_at) => Utc::now() < expires_at,
            None => false,
        }
    }
}

impl Default for TokenBlacklist {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenBlacklist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBlacklist")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
