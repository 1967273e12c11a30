//! Account row model

use chrono::{DateTime, Utc};
use uuid::Uuid;

use taskforge_types::{PublicUser, UserId};

/// Account row as stored by the backing store
///
/// `is_active` does double duty: it is both the "account enabled" flag and
/// the "email verified" flag. Email verification sets it to `true` and a
/// deactivated account cannot log in or refresh. Splitting the two would
/// change observable behavior, so the overload is kept deliberately.
#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountRow {
    /// Convert to domain UserId
    pub fn user_id(&self) -> UserId {
        UserId(self.id)
    }

    /// Projection safe to return to API callers
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.user_id(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role.clone(),
            is_active: self.is_active,
            created_at: self.created_at,
            last_login_at: self.last_login_at,
        }
    }
}

/// Create account input
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: String,
}
