//! In-memory account repository
//!
//! DashMap-backed implementation with a secondary email index. Suitable for
//! tests and single-process deployments; a persistent backend implements the
//! same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::models::{AccountRow, CreateAccount};
use crate::repo::AccountRepository;

/// In-memory account repository
#[derive(Default, Clone)]
pub struct MemoryAccountRepository {
    accounts: Arc<DashMap<Uuid, AccountRow>>,
    by_email: Arc<DashMap<String, Uuid>>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account row directly, bypassing `create`
    pub fn insert_account(&self, account: AccountRow) {
        self.by_email.insert(account.email.clone(), account.id);
        self.accounts.insert(account.id, account);
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<AccountRow>> {
        Ok(self.accounts.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<AccountRow>> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.accounts.get(id.value()).map(|r| r.value().clone())))
    }

    async fn create(&self, account: CreateAccount) -> StoreResult<AccountRow> {
        let now = Utc::now();
        let row = AccountRow {
            id: account.id,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            password_hash: account.password_hash,
            role: account.role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_account(row.clone());
        Ok(row)
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut account = self.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.password_hash = password_hash.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        let mut account = self.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.last_login_at = Some(at);
        Ok(())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> StoreResult<()> {
        let mut account = self.accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        account.is_active = active;
        account.updated_at = Utc::now();
        Ok(())
    }
}
