use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// An action that requires an anonymous session ran with an
    /// authenticated one.
    #[error("Already authenticated")]
    AlreadyAuthenticated,

    /// An action that requires an authenticated session ran with an
    /// anonymous one.
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
