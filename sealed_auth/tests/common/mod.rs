//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use sealed_auth::{
    Account, AccountFilter, Adapter, AdapterError, AuthAction, AuthConfig, AuthRequest,
    AuthResponse, CredentialsProvider, MemoryAdapter, NewAccount, NewUser, SealedCookieStore,
    User, handle_auth_request,
};

pub const SECRET: &[u8] = b"an example very very secret key.";
pub const PROVIDER: &str = "email-pass-provider";
pub const PROVIDER_ALT: &str = "email-pass-provider-alt";

pub fn default_config() -> AuthConfig {
    AuthConfig::builder()
        .secret(SECRET)
        .provider(CredentialsProvider::new(PROVIDER))
        .provider(CredentialsProvider::new(PROVIDER_ALT))
        .build()
        .expect("Failed to build config")
}

pub struct TestHarness {
    pub config: AuthConfig,
    pub adapter: MemoryAdapter,
    pub sessions: SealedCookieStore,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(default_config())
    }

    pub fn with_config(config: AuthConfig) -> Self {
        let sessions = SealedCookieStore::new(&config);
        Self {
            config,
            adapter: MemoryAdapter::new(),
            sessions,
        }
    }

    /// Run an action against a credentials provider.
    pub async fn post(
        &self,
        action: AuthAction,
        provider_id: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> AuthResponse {
        let mut request = AuthRequest::new(action)
            .provider("credentials", provider_id)
            .payload(body);
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        handle_auth_request(&self.config, &self.adapter, &self.sessions, request).await
    }

    /// Run a provider-less action (session check, signout).
    pub async fn send(&self, action: AuthAction, cookie: Option<&str>) -> AuthResponse {
        let mut request = AuthRequest::new(action);
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        handle_auth_request(&self.config, &self.adapter, &self.sessions, request).await
    }

    /// Sign up a fresh account and return the issued session cookie.
    pub async fn signup(&self, email: &str, password: &str) -> String {
        let response = self
            .post(
                AuthAction::SignUp,
                PROVIDER,
                serde_json::json!({"email": email, "password": password}),
                None,
            )
            .await;
        assert_eq!(response.status, 200, "signup fixture failed: {:?}", response.body);
        self.cookie(&response).expect("Signup should issue a cookie")
    }

    pub fn cookie(&self, response: &AuthResponse) -> Option<String> {
        response.session_cookie(self.config.cookie_name())
    }

    pub async fn counts(&self) -> (i64, i64) {
        let users = self.adapter.count_users().await.expect("count_users failed");
        let accounts = self
            .adapter
            .count_accounts()
            .await
            .expect("count_accounts failed");
        (users, accounts)
    }
}

/// Adapter whose every operation fails, for exercising the internal error
/// boundary.
pub struct FailingAdapter;

#[async_trait]
impl Adapter for FailingAdapter {
    async fn find_account(&self, _: &AccountFilter) -> Result<Option<Account>, AdapterError> {
        Err(AdapterError::Storage("connection refused".to_string()))
    }

    async fn find_accounts_by_user(&self, _: i64) -> Result<Vec<Account>, AdapterError> {
        Err(AdapterError::Storage("connection refused".to_string()))
    }

    async fn create_user(&self, _: NewUser) -> Result<User, AdapterError> {
        Err(AdapterError::Storage("connection refused".to_string()))
    }

    async fn create_account(&self, _: NewAccount) -> Result<Account, AdapterError> {
        Err(AdapterError::Storage("connection refused".to_string()))
    }

    async fn count_users(&self) -> Result<i64, AdapterError> {
        Err(AdapterError::Storage("connection refused".to_string()))
    }

    async fn count_accounts(&self) -> Result<i64, AdapterError> {
        Err(AdapterError::Storage("connection refused".to_string()))
    }
}
