//! Session state machine.
//!
//! A session is either `Anonymous` or `Authenticated`; signin and signup
//! require the former, linking and signout the latter. Guards run before any
//! persistence I/O so rejected actions cause no writes. A successful signin
//! or signup commits the user into the session and seals it; linking leaves
//! the session untouched.

use super::errors::SessionError;
use super::store::SessionStore;
use super::types::{Session, SessionUser};

/// Snapshot of the session state for an action decision.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(SessionUser),
}

impl SessionState {
    pub fn of(session: &Session) -> Self {
        match &session.user {
            Some(user) => SessionState::Authenticated(user.clone()),
            None => SessionState::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Guard for signin/signup: the session must be anonymous.
    pub fn require_anonymous(&self) -> Result<(), SessionError> {
        match self {
            SessionState::Anonymous => Ok(()),
            SessionState::Authenticated(_) => Err(SessionError::AlreadyAuthenticated),
        }
    }

    /// Guard for linking and signout: the session must be authenticated.
    pub fn require_authenticated(&self) -> Result<&SessionUser, SessionError> {
        match self {
            SessionState::Authenticated(user) => Ok(user),
            SessionState::Anonymous => Err(SessionError::NotAuthenticated),
        }
    }
}

/// Commit `user` into the session and seal it.
///
/// The returned sealed cookie is the only artifact of the commit; if sealing
/// fails the session value is discarded with the request.
pub async fn commit_session(
    store: &dyn SessionStore,
    session: &mut Session,
    user: SessionUser,
) -> Result<String, SessionError> {
    session.user = Some(user);
    store.save(session).await
}

/// Clear the session on signout.
pub fn clear_session(session: &mut Session) {
    session.user = None;
}
