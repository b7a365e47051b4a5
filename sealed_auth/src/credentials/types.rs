use serde::{Deserialize, Serialize};

/// Normalized credentials produced by a successful precheck.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Why a precheck rejected the raw payload.
///
/// Signin collapses every variant into one undifferentiated failure; signup
/// reports a per-defect message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecheckFailure {
    MissingCredentials,
    InvalidEmail,
    InvalidPassword,
}

/// Configuration for a single credentials provider.
///
/// Immutable once registered; the precheck is a pure function of the raw
/// payload and runs before any persistence access.
#[derive(Debug, Clone)]
pub struct CredentialsProvider {
    id: String,
    min_password_len: usize,
}

const DEFAULT_MIN_PASSWORD_LEN: usize = 8;

impl CredentialsProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }

    pub fn with_min_password_len(mut self, len: usize) -> Self {
        self.min_password_len = len;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Normalize and validate the raw request payload.
    pub fn precheck(&self, payload: &serde_json::Value) -> Result<Credentials, PrecheckFailure> {
        let email = payload
            .get("email")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(PrecheckFailure::MissingCredentials)?;
        let password = payload
            .get("password")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(PrecheckFailure::MissingCredentials)?;

        if !is_valid_email(email) {
            return Err(PrecheckFailure::InvalidEmail);
        }
        if password.len() < self.min_password_len {
            return Err(PrecheckFailure::InvalidPassword);
        }

        Ok(Credentials {
            email: email.to_ascii_lowercase(),
            password: password.to_string(),
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Provider-specific data stored on a credentials account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CredentialsAccountData {
    pub(crate) hash: String,
}
