use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum AdapterError {
    /// A uniqueness constraint was violated on insert.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::InvalidData(err.to_string())
    }
}
