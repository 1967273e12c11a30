//! Repository traits
//!
//! Async interface the auth core consumes. Implementations may suspend on
//! I/O; the core never holds its own locks across these calls.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::models::{AccountRow, CreateAccount};

/// Account repository trait
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<AccountRow>>;

    /// Find an account by email
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<AccountRow>>;

    /// Create a new account (active by default)
    async fn create(&self, account: CreateAccount) -> StoreResult<AccountRow>;

    /// Replace the stored password hash
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()>;

    /// Stamp the last successful login time
    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;

    /// Set the account active flag
    async fn set_active(&self, id: Uuid, active: bool) -> StoreResult<()>;
}
