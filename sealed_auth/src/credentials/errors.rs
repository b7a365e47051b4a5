use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum CredentialsError {
    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<UtilError> for CredentialsError {
    fn from(err: UtilError) -> Self {
        CredentialsError::Crypto(err.to_string())
    }
}
