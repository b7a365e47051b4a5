//! Immutable, explicitly constructed configuration for the auth core.
//!
//! The configuration value owns the provider registry and the server secret
//! and is passed by reference into every request-scoped call; there is no
//! ambient or static lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::credentials::CredentialsProvider;

/// Closed set of provider types known to this release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Credentials,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Credentials => "credentials",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credentials" => Ok(ProviderType::Credentials),
            _ => Err(()),
        }
    }
}

/// A registered authentication provider.
#[derive(Debug, Clone)]
pub enum Provider {
    Credentials(CredentialsProvider),
}

impl Provider {
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Provider::Credentials(_) => ProviderType::Credentials,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Provider::Credentials(p) => p.id(),
        }
    }
}

impl From<CredentialsProvider> for Provider {
    fn from(provider: CredentialsProvider) -> Self {
        Provider::Credentials(provider)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing secret: set one with secret() or the AUTH_SECRET environment variable")]
    MissingSecret,

    #[error("Weak secret: must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("No providers registered")]
    NoProviders,
}

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_COOKIE_NAME: &str = "auth.session";
const DEFAULT_SESSION_MAX_AGE: i64 = 14 * 86400;

/// Immutable configuration shared by every request.
pub struct AuthConfig {
    providers: Vec<Provider>,
    secret: Vec<u8>,
    debug: bool,
    account_linking_on_signup: bool,
    cookie_name: String,
    session_max_age: i64,
}

impl AuthConfig {
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Resolve a provider by `(type, id)`.
    pub fn find_provider(&self, provider_type: ProviderType, id: &str) -> Option<&Provider> {
        self.providers
            .iter()
            .find(|p| p.provider_type() == provider_type && p.id() == id)
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn account_linking_on_signup(&self) -> bool {
        self.account_linking_on_signup
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Session lifetime in seconds, used for both the seal and the cookie.
    pub fn session_max_age(&self) -> i64 {
        self.session_max_age
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("providers", &self.providers)
            .field("secret", &"<redacted>")
            .field("debug", &self.debug)
            .field("account_linking_on_signup", &self.account_linking_on_signup)
            .field("cookie_name", &self.cookie_name)
            .field("session_max_age", &self.session_max_age)
            .finish()
    }
}

#[derive(Default)]
pub struct AuthConfigBuilder {
    providers: Vec<Provider>,
    secret: Option<Vec<u8>>,
    debug: bool,
    disable_account_linking: bool,
    cookie_name: Option<String>,
    session_max_age: Option<i64>,
}

impl AuthConfigBuilder {
    /// Register a provider. Registration order decides nothing; lookup is by
    /// `(type, id)`.
    pub fn provider(mut self, provider: impl Into<Provider>) -> Self {
        self.providers.push(provider.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Read the secret from the `AUTH_SECRET` environment variable,
    /// loading a `.env` file first if one is present.
    pub fn secret_from_env(mut self) -> Self {
        dotenvy::dotenv().ok();
        self.secret = std::env::var("AUTH_SECRET").ok().map(String::into_bytes);
        self
    }

    /// Enable debug logging of internal errors swallowed at the action
    /// boundary.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Allow signup with an active session to attach a new account to the
    /// signed-in user. Enabled by default.
    pub fn account_linking_on_signup(mut self, enabled: bool) -> Self {
        self.disable_account_linking = !enabled;
        self
    }

    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Some(name.into());
        self
    }

    pub fn session_max_age(mut self, seconds: i64) -> Self {
        self.session_max_age = Some(seconds);
        self
    }

    pub fn build(self) -> Result<AuthConfig, ConfigError> {
        let secret = self.secret.ok_or(ConfigError::MissingSecret)?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }
        if self.providers.is_empty() {
            return Err(ConfigError::NoProviders);
        }
        Ok(AuthConfig {
            providers: self.providers,
            secret,
            debug: self.debug,
            account_linking_on_signup: !self.disable_account_linking,
            cookie_name: self
                .cookie_name
                .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
            session_max_age: self.session_max_age.unwrap_or(DEFAULT_SESSION_MAX_AGE),
        })
    }
}
