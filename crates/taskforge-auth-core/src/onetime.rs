//! Single-use opaque tokens
//!
//! Backs the password-reset and email-verification flows. Each token is an
//! unguessable random string mapped (by digest) to its owner and an absolute
//! expiry. Consuming a token deletes it; an expired token is deleted the
//! first time it is seen, so rolling the clock back cannot revive it.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;

use taskforge_types::UserId;

use crate::crypto::{generate_opaque_token, token_digest};
use crate::error::AuthError;

#[derive(Debug, Clone, Copy)]
struct OneTimeEntry {
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Store of outstanding single-use tokens
///
/// Issuing a new token for a user does not invalidate older ones; each is
/// independently consumable until used or expired.
#[derive(Default)]
pub struct OneTimeTokens {
    entries: DashMap<String, OneTimeEntry>,
}

impl OneTimeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a token for the user, valid for `ttl`
    ///
    /// Returns the raw token value for out-of-band delivery; only its
    /// digest is retained.
    pub fn issue(&self, user_id: UserId, ttl: ChronoDuration) -> String {
        let token = generate_opaque_token();
        self.entries.insert(
            token_digest(&token),
            OneTimeEntry {
                user_id,
                expires_at: Utc::now() + ttl,
            },
        );
        token
    }

    /// Validate a token without consuming it
    ///
    /// Unknown tokens fail as invalid. Expired tokens fail as expired and
    /// are deleted on the spot.
    pub fn peek(&self, token: &str) -> Result<UserId, AuthError> {
        let digest = token_digest(token);
        let entry = self
            .entries
            .get(&digest)
            .map(|e| *e.value())
            .ok_or(AuthError::InvalidToken)?;

        if Utc::now() >= entry.expires_at {
            self.entries.remove(&digest);
            return Err(AuthError::TokenExpired);
        }
        Ok(entry.user_id)
    }

    /// Validate and delete a token in one step
    pub fn consume(&self, token: &str) -> Result<UserId, AuthError> {
        let user_id = self.peek(token)?;
        self.discard(token);
        Ok(user_id)
    }

    /// Delete a token unconditionally
    pub fn discard(&self, token: &str) {
        self.entries.remove(&token_digest(token));
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }
}

impl std::fmt::Debug for OneTimeTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneTimeTokens")
            .field("outstanding", &self.entries.len())
            .finish()
    }
}
