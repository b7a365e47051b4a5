//! Sealed client-side sessions and the anonymous/authenticated state machine.

mod errors;
mod state;
mod store;
mod types;

pub use errors::SessionError;
pub use state::SessionState;
pub(crate) use state::{clear_session, commit_session};
pub use store::{SealedCookieStore, SessionStore};
pub use types::{Session, SessionUser};
