//! The single typed error surface for the auth core.

use thiserror::Error;

use crate::adapter::AdapterError;
use crate::credentials::CredentialsError;
use crate::response::ErrorCode;
use crate::session::SessionError;
use crate::utils::UtilError;

use super::AuthAction;

/// Errors raised during auth coordination.
///
/// Every domain failure travels as one of these up to the action boundary,
/// where it is translated to the response envelope. Variants wrapping
/// lower-level errors translate to `INTERNAL_SERVER_ERROR` with a generic
/// message; their detail never reaches the client.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed input or a policy violation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Credential verification failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A session query found no authenticated user.
    #[error("No session: {0}")]
    NoSession(String),

    /// Error from the persistence adapter
    #[error("Adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Error from session operations
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from credential hashing
    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AuthError {
    /// Log the error at debug level and return self, allowing method
    /// chaining at the raise site.
    pub(crate) fn log(self) -> Self {
        tracing::debug!("{}", self);
        self
    }

    /// Translate into the envelope `(code, message)` pair for `action`.
    pub(crate) fn envelope(&self, action: AuthAction) -> (ErrorCode, String) {
        match self {
            AuthError::BadRequest(message) => (ErrorCode::BadRequest, message.clone()),
            AuthError::Unauthorized(message) => (ErrorCode::Unauthorized, message.clone()),
            AuthError::NoSession(message) => (ErrorCode::NoSession, message.clone()),
            AuthError::Session(SessionError::AlreadyAuthenticated) => {
                (ErrorCode::BadRequest, "Already signed in".to_string())
            }
            AuthError::Session(SessionError::NotAuthenticated) => {
                (ErrorCode::Unauthorized, "Invalid session".to_string())
            }
            // A uniqueness race lost at the adapter reads the same as the
            // explicit pre-insert check.
            AuthError::Adapter(AdapterError::Conflict(_)) => {
                (ErrorCode::BadRequest, "Account already exists".to_string())
            }
            _ => (
                ErrorCode::InternalServerError,
                action.generic_error().to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<AuthError>();
    }

    #[test]
    fn test_envelope_for_domain_errors() {
        let err = AuthError::BadRequest("Invalid credentials".to_string());
        assert_eq!(
            err.envelope(AuthAction::SignIn),
            (ErrorCode::BadRequest, "Invalid credentials".to_string())
        );

        let err = AuthError::Unauthorized("Invalid credentials".to_string());
        assert_eq!(
            err.envelope(AuthAction::SignIn),
            (ErrorCode::Unauthorized, "Invalid credentials".to_string())
        );

        let err = AuthError::NoSession("Session not found".to_string());
        assert_eq!(
            err.envelope(AuthAction::Session),
            (ErrorCode::NoSession, "Session not found".to_string())
        );
    }

    #[test]
    fn test_envelope_for_session_state_errors() {
        let err = AuthError::Session(SessionError::AlreadyAuthenticated);
        assert_eq!(
            err.envelope(AuthAction::SignUp),
            (ErrorCode::BadRequest, "Already signed in".to_string())
        );

        let err = AuthError::Session(SessionError::NotAuthenticated);
        assert_eq!(
            err.envelope(AuthAction::LinkAccount),
            (ErrorCode::Unauthorized, "Invalid session".to_string())
        );
    }

    #[test]
    fn test_envelope_for_adapter_conflict() {
        let err = AuthError::Adapter(AdapterError::Conflict("users.email".to_string()));
        assert_eq!(
            err.envelope(AuthAction::SignUp),
            (ErrorCode::BadRequest, "Account already exists".to_string())
        );
    }

    #[test]
    fn test_envelope_never_leaks_internal_detail() {
        let err = AuthError::Adapter(AdapterError::Storage(
            "connection refused to db.internal:5432".to_string(),
        ));
        let (code, message) = err.envelope(AuthAction::SignIn);
        assert_eq!(code, ErrorCode::InternalServerError);
        assert_eq!(message, "Unexpected error signing in");

        let err = AuthError::Session(SessionError::Storage("redis down".to_string()));
        let (code, message) = err.envelope(AuthAction::SignUp);
        assert_eq!(code, ErrorCode::InternalServerError);
        assert_eq!(message, "Unexpected error signing up");
    }

    #[test]
    fn test_error_log_returns_self() {
        let err = AuthError::BadRequest("Invalid provider".to_string()).log();
        assert!(matches!(err, AuthError::BadRequest(_)));
    }
}
