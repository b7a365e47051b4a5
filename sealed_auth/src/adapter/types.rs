use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::config::ProviderType;

/// A persisted user identity.
///
/// Created at most once per unique email during signup; may own one account
/// per provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    /// Adapter-assigned numeric identifier (primary key).
    pub id: i64,
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a user; the adapter assigns id and timestamps.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl NewUser {
    /// The shape created by a credentials signup: email only.
    pub fn from_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

/// The linkage between one provider identity and one user.
///
/// `(provider_type, provider_id, account_id)` is unique across all accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub provider_type: ProviderType,
    pub provider_id: String,
    /// Provider-scoped identifier; the email for credentials providers.
    pub account_id: String,
    /// Opaque provider-specific JSON blob; `{"hash": …}` for credentials.
    pub provider_account_data: Option<String>,
    pub user: User,
}

/// Fields for creating an account attached to an existing user.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: i64,
    pub provider_type: ProviderType,
    pub provider_id: String,
    pub account_id: String,
    pub provider_account_data: Option<String>,
}

/// Lookup key for [`Adapter::find_account`](super::Adapter::find_account).
#[derive(Debug, Clone, PartialEq)]
pub struct AccountFilter {
    pub provider_type: ProviderType,
    pub provider_id: String,
    pub account_id: String,
}

impl AccountFilter {
    pub fn new(
        provider_type: ProviderType,
        provider_id: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            provider_type,
            provider_id: provider_id.into(),
            account_id: account_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_from_email() {
        let fields = NewUser::from_email("test@example.com");
        assert_eq!(fields.email.as_deref(), Some("test@example.com"));
        assert!(fields.username.is_none());
        assert!(fields.name.is_none());
        assert!(fields.image.is_none());
    }

    #[test]
    fn test_user_serde_roundtrip() {
        let now = Utc::now();
        let user = User {
            id: 7,
            username: None,
            name: Some("Test User".to_string()),
            email: Some("test@example.com".to_string()),
            image: None,
            created_at: now,
            updated_at: now,
        };

        let serialized = serde_json::to_string(&user).expect("Failed to serialize");
        let deserialized: User = serde_json::from_str(&serialized).expect("Failed to deserialize");
        assert_eq!(deserialized.id, 7);
        assert_eq!(deserialized.email.as_deref(), Some("test@example.com"));
    }

    #[test]
    fn test_account_filter_new() {
        let filter = AccountFilter::new(
            ProviderType::Credentials,
            "email-pass-provider",
            "test@example.com",
        );
        assert_eq!(filter.provider_type, ProviderType::Credentials);
        assert_eq!(filter.provider_id, "email-pass-provider");
        assert_eq!(filter.account_id, "test@example.com");
    }
}
