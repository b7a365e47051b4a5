//! Sealed session store: the trust boundary between the client-held cookie
//! and the in-process session.
//!
//! [`SealedCookieStore`] seals the session as
//! `base64url(json payload).base64url(HMAC-SHA256(secret, payload))`. A
//! cookie that is absent, malformed, tampered with or expired loads as the
//! anonymous session; unseal failures carry no information for the caller.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::utils::base64url_decode;

use super::errors::SessionError;
use super::types::Session;

type HmacSha256 = Hmac<Sha256>;

/// Load/save interface for the sealed session.
///
/// One load and at most one save per request; implementations must not share
/// mutable state between requests.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Unseal the cookie into a session. An unusable cookie yields the
    /// anonymous session rather than an error.
    async fn load(&self, sealed: Option<&str>) -> Result<Session, SessionError>;

    /// Seal the session, returning the cookie value to hand to the client.
    async fn save(&self, session: &Session) -> Result<String, SessionError>;
}

#[derive(Serialize, Deserialize)]
struct SealedPayload {
    session: Session,
    expires_at: DateTime<Utc>,
}

/// HMAC-sealed cookie store keyed with the server secret.
pub struct SealedCookieStore {
    secret: Vec<u8>,
    max_age: i64,
}

impl SealedCookieStore {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.secret().to_vec(),
            max_age: config.session_max_age(),
        }
    }

    fn sign(&self, payload: &str) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn unseal(&self, sealed: &str) -> Option<Session> {
        let (payload, signature) = sealed.split_once('.')?;
        let signature = base64url_decode(signature).ok()?;
        let expected = self.sign(payload);
        if !bool::from(expected.ct_eq(&signature)) {
            tracing::debug!("Rejecting sealed session with bad signature");
            return None;
        }

        let payload = base64url_decode(payload).ok()?;
        let payload: SealedPayload = serde_json::from_slice(&payload).ok()?;
        if payload.expires_at < Utc::now() {
            tracing::debug!("Rejecting expired sealed session");
            return None;
        }
        Some(payload.session)
    }
}

#[async_trait]
impl SessionStore for SealedCookieStore {
    async fn load(&self, sealed: Option<&str>) -> Result<Session, SessionError> {
        let session = sealed
            .filter(|s| !s.is_empty())
            .and_then(|s| self.unseal(s))
            .unwrap_or_else(Session::anonymous);
        Ok(session)
    }

    async fn save(&self, session: &Session) -> Result<String, SessionError> {
        let payload = SealedPayload {
            session: session.clone(),
            expires_at: Utc::now() + Duration::seconds(self.max_age),
        };
        let payload = serde_json::to_vec(&payload)
            .map_err(|e| SessionError::Crypto(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let signature = URL_SAFE_NO_PAD.encode(self.sign(&payload));
        Ok(format!("{payload}.{signature}"))
    }
}
