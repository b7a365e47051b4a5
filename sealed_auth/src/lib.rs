//! sealed_auth - Credentials authentication core with sealed session cookies
//!
//! Given an inbound authentication action (sign up, sign in, sign out,
//! session check, link account) and its payload, this crate runs the matching
//! provider flow against a pluggable persistence adapter, manages an
//! HMAC-sealed client-side session cookie, and produces a uniform JSON
//! response envelope. HTTP routing and framework request/response types are
//! the host's concern.
//!
//! ```no_run
//! use sealed_auth::{
//!     AuthAction, AuthConfig, AuthRequest, CredentialsProvider, MemoryAdapter,
//!     SealedCookieStore, handle_auth_request,
//! };
//!
//! # async fn run() {
//! let config = AuthConfig::builder()
//!     .secret_from_env()
//!     .provider(CredentialsProvider::new("email-pass-provider"))
//!     .build()
//!     .unwrap();
//! let adapter = MemoryAdapter::new();
//! let sessions = SealedCookieStore::new(&config);
//!
//! let request = AuthRequest::new(AuthAction::SignUp)
//!     .provider("credentials", "email-pass-provider")
//!     .payload(serde_json::json!({
//!         "email": "test@example.com",
//!         "password": "sup3r-secret",
//!     }));
//! let response = handle_auth_request(&config, &adapter, &sessions, request).await;
//! assert_eq!(response.status, 200);
//! # }
//! ```

mod adapter;
mod config;
mod coordination;
mod credentials;
mod response;
mod session;
mod utils;

pub use adapter::{
    Account, AccountFilter, Adapter, AdapterError, MemoryAdapter, NewAccount, NewUser,
    SqliteAdapter, User,
};
pub use config::{AuthConfig, AuthConfigBuilder, ConfigError, Provider, ProviderType};
pub use coordination::{AuthAction, AuthError, AuthRequest, handle_auth_request};
pub use credentials::{Credentials, CredentialsError, CredentialsProvider, PrecheckFailure};
pub use response::{ApiResponse, AuthResponse, ErrorCode};
pub use session::{
    SealedCookieStore, Session, SessionError, SessionState, SessionStore, SessionUser,
};
