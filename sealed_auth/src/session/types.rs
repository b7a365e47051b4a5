use serde::{Deserialize, Serialize};

use crate::adapter::User as DbUser;

/// The user as carried in the sealed session and echoed in responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: i64,
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl From<DbUser> for SessionUser {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            image: user.image,
        }
    }
}

/// Transient per-request session state.
///
/// Created empty when the request carries no (valid) sealed cookie; `user`
/// absent means anonymous. Never persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}
