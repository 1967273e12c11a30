//! Per-user session tracking
//!
//! One record per login event, independent of the tokens that login minted.
//! At most one record per user carries `is_current = true`; creating a new
//! session flips every sibling to false. Each read-modify-write runs under
//! the shard lock for the user key, so concurrent logins and revocations
//! for the same user never interleave mid-update.

use chrono::Utc;
use dashmap::DashMap;

use taskforge_types::{SessionId, SessionRecord, UserId};

use crate::crypto::generate_opaque_token;

/// Registry of active sessions, keyed by user
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<UserId, Vec<SessionRecord>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new login as the user's current session
    ///
    /// Flips every existing session for the user to not-current.
    pub fn create(
        &self,
        user_id: UserId,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> SessionRecord {
        let now = Utc::now();
        let record = SessionRecord {
            id: SessionId::from(generate_opaque_token()),
            user_id,
            created_at: now,
            last_activity: now,
            ip_address,
            user_agent,
            is_current: true,
        };

        let mut entry = self.sessions.entry(user_id).or_default();
        for session in entry.iter_mut() {
            session.is_current = false;
        }
        entry.push(record.clone());
        record
    }

    /// List the user's sessions in insertion order
    ///
    /// Empty for an unknown user; never an error.
    pub fn list(&self, user_id: UserId) -> Vec<SessionRecord> {
        self.sessions
            .get(&user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Remove one session by id; returns whether it existed
    pub fn revoke(&self, user_id: UserId, session_id: &SessionId) -> bool {
        let found = match self.sessions.get_mut(&user_id) {
            Some(mut entry) => {
                let before = entry.len();
                entry.retain(|s| &s.id != session_id);
                entry.len() != before
            }
            None => false,
        };
        self.drop_if_empty(user_id);
        found
    }

    /// Remove the user's current session (logout)
    pub fn revoke_current(&self, user_id: UserId) {
        if let Some(mut entry) = self.sessions.get_mut(&user_id) {
            entry.retain(|s| !s.is_current);
        }
        self.drop_if_empty(user_id);
    }

    /// Keep only the current session (password change)
    ///
    /// The device that just proved the password stays logged in; every
    /// other device must re-authenticate.
    pub fn revoke_all_except_current(&self, user_id: UserId) {
        if let Some(mut entry) = self.sessions.get_mut(&user_id) {
            entry.retain(|s| s.is_current);
        }
        self.drop_if_empty(user_id);
    }

    /// Remove every session for the user (password reset)
    pub fn revoke_all(&self, user_id: UserId) {
        self.sessions.remove(&user_id);
    }

    /// Update a session's last-activity timestamp
    pub fn touch(&self, user_id: UserId, session_id: &SessionId) -> bool {
        if let Some(mut entry) = self.sessions.get_mut(&user_id) {
            if let Some(session) = entry.iter_mut().find(|s| &s.id == session_id) {
                session.last_activity = Utc::now();
                return true;
            }
        }
        false
    }

    fn drop_if_empty(&self, user_id: UserId) {
        self.sessions.remove_if(&user_id, |_, entry| entry.is_empty());
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("users", &self.sessions.len())
            .finish()
    }
}
