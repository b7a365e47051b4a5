//! Auth action orchestrator.
//!
//! Resolves the requested provider from configuration, dispatches to the
//! provider-type-specific flow, and translates every outcome into the
//! uniform response envelope. This is the single catch-and-translate point:
//! unexpected internal errors are logged (only when the debug flag is on)
//! and surfaced as `INTERNAL_SERVER_ERROR` with a generic message.

mod credentials;
mod errors;
mod session;

use std::fmt;
use std::str::FromStr;

use http::HeaderMap;

use crate::adapter::Adapter;
use crate::config::{AuthConfig, Provider};
use crate::response::{ApiResponse, AuthResponse, ErrorCode};
use crate::session::{Session, SessionStore};
use crate::utils::header_set_cookie;

pub use errors::AuthError;

/// The authentication actions this core handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    SignOut,
    Session,
    LinkAccount,
    Callback,
}

impl AuthAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthAction::SignIn => "signin",
            AuthAction::SignUp => "signup",
            AuthAction::SignOut => "signout",
            AuthAction::Session => "session",
            AuthAction::LinkAccount => "linkaccount",
            AuthAction::Callback => "callback",
        }
    }

    /// Generic client-facing message for unclassified failures.
    pub(crate) fn generic_error(&self) -> &'static str {
        match self {
            AuthAction::SignIn => "Unexpected error signing in",
            AuthAction::SignUp => "Unexpected error signing up",
            AuthAction::SignOut => "Unexpected error signing out",
            AuthAction::Session => "Unexpected error fetching session",
            AuthAction::LinkAccount => "Unexpected error linking account",
            AuthAction::Callback => "Unexpected error",
        }
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signin" => Ok(AuthAction::SignIn),
            "signup" => Ok(AuthAction::SignUp),
            "signout" => Ok(AuthAction::SignOut),
            "session" => Ok(AuthAction::Session),
            "linkaccount" => Ok(AuthAction::LinkAccount),
            "callback" => Ok(AuthAction::Callback),
            _ => Err(()),
        }
    }
}

/// An inbound request after the host's routing glue has resolved the action.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub action: AuthAction,
    pub provider_type: Option<String>,
    pub provider_id: Option<String>,
    pub payload: serde_json::Value,
    /// The raw sealed session cookie value, if the request carried one.
    pub cookie: Option<String>,
}

impl AuthRequest {
    pub fn new(action: AuthAction) -> Self {
        Self {
            action,
            provider_type: None,
            provider_id: None,
            payload: serde_json::Value::Null,
            cookie: None,
        }
    }

    pub fn provider(mut self, provider_type: impl Into<String>, id: impl Into<String>) -> Self {
        self.provider_type = Some(provider_type.into());
        self.provider_id = Some(id.into());
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }
}

/// Outcome of a successfully dispatched action, before envelope assembly.
struct Completed {
    data: serde_json::Value,
    cookie: CookieUpdate,
}

/// What to do with the session cookie in the response.
enum CookieUpdate {
    /// No cookie header; the session was not newly committed.
    Unchanged,
    /// Set the sealed cookie value.
    Set(String),
    /// Expire the cookie.
    Clear,
}

/// Handle one authentication request end to end.
///
/// Always returns an envelope; this function does not fail.
pub async fn handle_auth_request(
    config: &AuthConfig,
    adapter: &dyn Adapter,
    sessions: &dyn SessionStore,
    request: AuthRequest,
) -> AuthResponse {
    let mut session = match sessions.load(request.cookie.as_deref()).await {
        Ok(session) => session,
        Err(err) => return error_response(config, request.action, AuthError::Session(err)),
    };

    match dispatch(config, adapter, sessions, &request, &mut session).await {
        Ok(completed) => {
            let mut headers = HeaderMap::new();
            let cookie_set = match &completed.cookie {
                CookieUpdate::Unchanged => Ok(()),
                CookieUpdate::Set(value) => header_set_cookie(
                    &mut headers,
                    config.cookie_name(),
                    value,
                    config.session_max_age(),
                )
                .map(|_| ()),
                CookieUpdate::Clear => {
                    header_set_cookie(&mut headers, config.cookie_name(), "", -86400).map(|_| ())
                }
            };
            if let Err(err) = cookie_set {
                return error_response(config, request.action, AuthError::Utils(err));
            }
            AuthResponse {
                status: ErrorCode::Ok.status(),
                body: ApiResponse::ok(completed.data),
                headers,
            }
        }
        Err(err) => error_response(config, request.action, err),
    }
}

async fn dispatch(
    config: &AuthConfig,
    adapter: &dyn Adapter,
    sessions: &dyn SessionStore,
    request: &AuthRequest,
    session: &mut Session,
) -> Result<Completed, AuthError> {
    match request.action {
        AuthAction::SignIn => {
            let provider = assert_provider(config, request)?;
            credentials::signin(config, adapter, sessions, provider, session, &request.payload)
                .await
        }
        AuthAction::SignUp => {
            let provider = assert_provider(config, request)?;
            credentials::signup(config, adapter, sessions, provider, session, &request.payload)
                .await
        }
        AuthAction::LinkAccount => {
            let provider = assert_provider(config, request)?;
            credentials::link_account(config, adapter, provider, session, &request.payload).await
        }
        AuthAction::Callback => {
            // Callbacks only exist for redirect-based providers; a
            // credentials registry has none.
            let provider = assert_provider(config, request)?;
            match provider {
                Provider::Credentials(_) => {
                    Err(AuthError::BadRequest("Unexpected error".to_string()).log())
                }
            }
        }
        AuthAction::Session => session::session(session),
        AuthAction::SignOut => session::signout(session),
    }
}

/// Resolve the requested provider by `(type, id)`; absence is a generic
/// bad request so provider ids cannot be probed.
fn assert_provider<'c>(
    config: &'c AuthConfig,
    request: &AuthRequest,
) -> Result<&'c Provider, AuthError> {
    let (Some(provider_type), Some(provider_id)) = (
        request.provider_type.as_deref(),
        request.provider_id.as_deref(),
    ) else {
        return Err(AuthError::BadRequest("Invalid provider".to_string()).log());
    };

    let provider_type = provider_type
        .parse()
        .map_err(|_| AuthError::BadRequest("Invalid provider".to_string()).log())?;

    config
        .find_provider(provider_type, provider_id)
        .ok_or_else(|| AuthError::BadRequest("Invalid provider".to_string()).log())
}

fn error_response(config: &AuthConfig, action: AuthAction, err: AuthError) -> AuthResponse {
    let (code, message) = err.envelope(action);
    if code == ErrorCode::InternalServerError && config.debug() {
        tracing::error!("Error handling {}: {}", action, err);
    }
    AuthResponse {
        status: code.status(),
        body: ApiResponse::error(code, message),
        headers: HeaderMap::new(),
    }
}
