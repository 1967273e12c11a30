//! Session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Unique session identifier
///
/// Opaque, unguessable value minted by the auth core (256 bits of CSPRNG
/// output, base64url-encoded). Never derived from user data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One login instance, independent of the tokens it produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session ID
    pub id: SessionId,
    /// User who owns the session
    pub user_id: UserId,
    /// Session creation time
    pub created_at: DateTime<Utc>,
    /// Last activity time
    pub last_activity: DateTime<Utc>,
    /// Client IP at login
    pub ip_address: Option<String>,
    /// Client user agent at login
    pub user_agent: Option<String>,
    /// Whether this is the most recent login for the user
    pub is_current: bool,
}
