//! Session check and signout flows.

use crate::session::{Session, clear_session};

use super::errors::AuthError;
use super::{Completed, CookieUpdate};

/// Report the current session. Finding no authenticated user is not a
/// failure of the request; it maps to a 200 with `NO_SESSION`.
pub(super) fn session(session: &Session) -> Result<Completed, AuthError> {
    if !session.is_authenticated() {
        return Err(AuthError::NoSession("Session not found".to_string()).log());
    }
    Ok(Completed {
        data: serde_json::to_value(session)?,
        cookie: CookieUpdate::Unchanged,
    })
}

/// Clear the session and expire the cookie.
pub(super) fn signout(session: &mut Session) -> Result<Completed, AuthError> {
    if !session.is_authenticated() {
        return Err(AuthError::NoSession("Session not found".to_string()).log());
    }
    clear_session(session);
    Ok(Completed {
        data: serde_json::Value::Null,
        cookie: CookieUpdate::Clear,
    })
}
