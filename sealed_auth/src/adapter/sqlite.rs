use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Pool, Sqlite};

use crate::config::ProviderType;

use super::errors::AdapterError;
use super::types::{Account, AccountFilter, NewAccount, NewUser, User};
use super::Adapter;

/// SQLite adapter backed by an sqlx pool.
///
/// The UNIQUE constraints on `users.email` and on the account triple are what
/// make the core's check-then-insert sequences safe under concurrency; a
/// losing writer gets [`AdapterError::Conflict`].
pub struct SqliteAdapter {
    pool: Pool<Sqlite>,
}

#[derive(FromRow)]
struct AccountRow {
    id: i64,
    user_id: i64,
    provider_type: String,
    provider_id: String,
    account_id: String,
    provider_account_data: Option<String>,
}

impl SqliteAdapter {
    /// Connect to `url` (e.g. `sqlite::memory:` or `sqlite://auth.db`) and
    /// create the schema if it does not exist yet.
    pub async fn connect(url: &str) -> Result<Self, AdapterError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|e| AdapterError::Storage(e.to_string()))?;
        let adapter = Self { pool };
        adapter.create_tables().await?;
        Ok(adapter)
    }

    async fn create_tables(&self) -> Result<(), AdapterError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT,
                name TEXT,
                email TEXT UNIQUE,
                image TEXT,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AdapterError::Storage(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                provider_type TEXT NOT NULL,
                provider_id TEXT NOT NULL,
                account_id TEXT NOT NULL,
                provider_account_data TEXT,
                UNIQUE (provider_type, provider_id, account_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AdapterError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AdapterError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AdapterError::Storage(e.to_string()))
    }

    async fn assemble(&self, row: AccountRow) -> Result<Account, AdapterError> {
        let provider_type: ProviderType = row
            .provider_type
            .parse()
            .map_err(|_| {
                AdapterError::InvalidData(format!("Unknown provider type {}", row.provider_type))
            })?;
        let user = self
            .get_user(row.user_id)
            .await?
            .ok_or_else(|| AdapterError::InvalidData(format!("Account {} has no user", row.id)))?;
        Ok(Account {
            id: row.id,
            provider_type,
            provider_id: row.provider_id,
            account_id: row.account_id,
            provider_account_data: row.provider_account_data,
            user,
        })
    }
}

fn map_insert_error(err: sqlx::Error, constraint: &str) -> AdapterError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AdapterError::Conflict(constraint.to_string())
        }
        _ => AdapterError::Storage(err.to_string()),
    }
}

#[async_trait]
impl Adapter for SqliteAdapter {
    async fn find_account(
        &self,
        filter: &AccountFilter,
    ) -> Result<Option<Account>, AdapterError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT * FROM accounts
            WHERE provider_type = ? AND provider_id = ? AND account_id = ?
            "#,
        )
        .bind(filter.provider_type.as_str())
        .bind(&filter.provider_id)
        .bind(&filter.account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AdapterError::Storage(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(self.assemble(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_accounts_by_user(&self, user_id: i64) -> Result<Vec<Account>, AdapterError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT * FROM accounts WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdapterError::Storage(e.to_string()))?;

        let mut accounts = Vec::with_capacity(rows.len());
        for row in rows {
            accounts.push(self.assemble(row).await?);
        }
        Ok(accounts)
    }

    async fn create_user(&self, fields: NewUser) -> Result<User, AdapterError> {
        let now: DateTime<Utc> = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, name, email, image, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.username)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.image)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "users.email"))?;

        self.get_user(result.last_insert_rowid())
            .await?
            .ok_or_else(|| AdapterError::Storage("Inserted user not found".to_string()))
    }

    async fn create_account(&self, fields: NewAccount) -> Result<Account, AdapterError> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (user_id, provider_type, provider_id, account_id, provider_account_data)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(fields.user_id)
        .bind(fields.provider_type.as_str())
        .bind(&fields.provider_id)
        .bind(&fields.account_id)
        .bind(&fields.provider_account_data)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "accounts (provider_type, provider_id, account_id)"))?;

        let user = self
            .get_user(fields.user_id)
            .await?
            .ok_or_else(|| AdapterError::InvalidData(format!("No user with id {}", fields.user_id)))?;

        Ok(Account {
            id: result.last_insert_rowid(),
            provider_type: fields.provider_type,
            provider_id: fields.provider_id,
            account_id: fields.account_id,
            provider_account_data: fields.provider_account_data,
            user,
        })
    }

    async fn count_users(&self) -> Result<i64, AdapterError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AdapterError::Storage(e.to_string()))?;
        Ok(count)
    }

    async fn count_accounts(&self) -> Result<i64, AdapterError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AdapterError::Storage(e.to_string()))?;
        Ok(count)
    }
}
