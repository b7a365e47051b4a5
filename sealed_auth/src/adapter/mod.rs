//! Persistence adapter interface and reference implementations.
//!
//! The auth core never talks to storage directly; it goes through the
//! [`Adapter`] trait. Implementations must make "check uniqueness then
//! insert" effectively atomic per account triple and per user email, which
//! the SQLite adapter gets from UNIQUE constraints and the in-memory adapter
//! from holding its lock across the check and the insert.

mod errors;
mod memory;
mod sqlite;
mod types;

use async_trait::async_trait;

pub use errors::AdapterError;
pub use memory::MemoryAdapter;
pub use sqlite::SqliteAdapter;
pub use types::{Account, AccountFilter, NewAccount, NewUser, User};

#[async_trait]
pub trait Adapter: Send + Sync {
    /// Look up an account by its unique `(type, provider_id, account_id)`
    /// triple, with its owning user attached.
    async fn find_account(&self, filter: &AccountFilter)
    -> Result<Option<Account>, AdapterError>;

    /// All accounts owned by a user.
    async fn find_accounts_by_user(&self, user_id: i64) -> Result<Vec<Account>, AdapterError>;

    /// Create a user. Fails with [`AdapterError::Conflict`] when the email is
    /// already taken.
    async fn create_user(&self, fields: NewUser) -> Result<User, AdapterError>;

    /// Create an account attached to an existing user. Fails with
    /// [`AdapterError::Conflict`] when the account triple is already taken.
    async fn create_account(&self, fields: NewAccount) -> Result<Account, AdapterError>;

    async fn count_users(&self) -> Result<i64, AdapterError>;

    async fn count_accounts(&self) -> Result<i64, AdapterError>;
}
