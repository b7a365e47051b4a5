use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::config::ProviderType;

use super::errors::AdapterError;
use super::types::{Account, AccountFilter, NewAccount, NewUser, User};
use super::Adapter;

/// In-memory adapter for tests and examples.
///
/// The mutex is held across uniqueness checks and inserts, so the atomicity
/// the core requires from adapters holds here by construction.
pub struct MemoryAdapter {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    accounts: Vec<StoredAccount>,
    next_user_id: i64,
    next_account_id: i64,
}

#[derive(Clone)]
struct StoredAccount {
    id: i64,
    user_id: i64,
    provider_type: ProviderType,
    provider_id: String,
    account_id: String,
    provider_account_data: Option<String>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        tracing::debug!("Creating new in-memory adapter");
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Inner {
    fn assemble(&self, stored: &StoredAccount) -> Result<Account, AdapterError> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == stored.user_id)
            .cloned()
            .ok_or_else(|| {
                AdapterError::InvalidData(format!("Account {} has no user", stored.id))
            })?;
        Ok(Account {
            id: stored.id,
            provider_type: stored.provider_type,
            provider_id: stored.provider_id.clone(),
            account_id: stored.account_id.clone(),
            provider_account_data: stored.provider_account_data.clone(),
            user,
        })
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn find_account(
        &self,
        filter: &AccountFilter,
    ) -> Result<Option<Account>, AdapterError> {
        let inner = self.inner.lock().await;
        inner
            .accounts
            .iter()
            .find(|a| {
                a.provider_type == filter.provider_type
                    && a.provider_id == filter.provider_id
                    && a.account_id == filter.account_id
            })
            .map(|stored| inner.assemble(stored))
            .transpose()
    }

    async fn find_accounts_by_user(&self, user_id: i64) -> Result<Vec<Account>, AdapterError> {
        let inner = self.inner.lock().await;
        inner
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|stored| inner.assemble(stored))
            .collect()
    }

    async fn create_user(&self, fields: NewUser) -> Result<User, AdapterError> {
        let mut inner = self.inner.lock().await;
        if let Some(email) = &fields.email {
            if inner.users.iter().any(|u| u.email.as_ref() == Some(email)) {
                return Err(AdapterError::Conflict(format!("users.email {email}")));
            }
        }

        inner.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.next_user_id,
            username: fields.username,
            name: fields.name,
            email: fields.email,
            image: fields.image,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn create_account(&self, fields: NewAccount) -> Result<Account, AdapterError> {
        let mut inner = self.inner.lock().await;
        if !inner.users.iter().any(|u| u.id == fields.user_id) {
            return Err(AdapterError::InvalidData(format!(
                "No user with id {}",
                fields.user_id
            )));
        }
        if inner.accounts.iter().any(|a| {
            a.provider_type == fields.provider_type
                && a.provider_id == fields.provider_id
                && a.account_id == fields.account_id
        }) {
            return Err(AdapterError::Conflict(format!(
                "accounts ({}, {}, {})",
                fields.provider_type, fields.provider_id, fields.account_id
            )));
        }

        inner.next_account_id += 1;
        let stored = StoredAccount {
            id: inner.next_account_id,
            user_id: fields.user_id,
            provider_type: fields.provider_type,
            provider_id: fields.provider_id,
            account_id: fields.account_id,
            provider_account_data: fields.provider_account_data,
        };
        let account = inner.assemble(&stored)?;
        inner.accounts.push(stored);
        Ok(account)
    }

    async fn count_users(&self) -> Result<i64, AdapterError> {
        Ok(self.inner.lock().await.users.len() as i64)
    }

    async fn count_accounts(&self) -> Result<i64, AdapterError> {
        Ok(self.inner.lock().await.accounts.len() as i64)
    }
}
