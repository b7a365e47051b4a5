//! Credentials provider: payload precheck and keyed password verification.

mod errors;
mod types;
mod verifier;

pub use errors::CredentialsError;
pub use types::{Credentials, CredentialsProvider, PrecheckFailure};
pub(crate) use types::CredentialsAccountData;
pub(crate) use verifier::{hash_password, verify_password};
