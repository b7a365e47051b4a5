//! Uniform response envelope produced for every action.

use http::header::{HeaderMap, SET_COOKIE};
use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Closed set of envelope codes.
///
/// `NO_SESSION` is not a failure of the request itself: a session query that
/// finds no authenticated user still maps to HTTP 200.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Ok,
    NoSession,
    BadRequest,
    Unauthorized,
    InternalServerError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::Ok | ErrorCode::NoSession => StatusCode::OK,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `{success, code, data?, error?}` as serialized to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: ErrorCode::Ok,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Final outcome of one handled action: status, envelope body, and the
/// headers to attach (a `Set-Cookie` only when the session changed).
#[derive(Debug)]
pub struct AuthResponse {
    pub status: StatusCode,
    pub body: ApiResponse<serde_json::Value>,
    pub headers: HeaderMap,
}

impl AuthResponse {
    /// The value of the session cookie named `name` set by this response, if
    /// any. Empty string for an expiring cookie.
    pub fn session_cookie(&self, name: &str) -> Option<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|cookie| {
                let pair = cookie.split(';').next()?;
                let (cookie_name, value) = pair.split_once('=')?;
                (cookie_name == name).then(|| value.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::header_set_cookie;
    use serde_json::json;

    #[test]
    fn test_error_code_serialization() {
        assert_eq!(
            serde_json::to_value(ErrorCode::Ok).expect("Failed to serialize"),
            json!("OK")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::NoSession).expect("Failed to serialize"),
            json!("NO_SESSION")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::BadRequest).expect("Failed to serialize"),
            json!("BAD_REQUEST")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::Unauthorized).expect("Failed to serialize"),
            json!("UNAUTHORIZED")
        );
        assert_eq!(
            serde_json::to_value(ErrorCode::InternalServerError).expect("Failed to serialize"),
            json!("INTERNAL_SERVER_ERROR")
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::Ok.status(), StatusCode::OK);
        assert_eq!(ErrorCode::NoSession.status(), StatusCode::OK);
        assert_eq!(ErrorCode::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorCode::InternalServerError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_envelope_shape() {
        let ok = ApiResponse::ok(json!({"id": 1}));
        let value = serde_json::to_value(&ok).expect("Failed to serialize");
        assert_eq!(
            value,
            json!({"success": true, "code": "OK", "data": {"id": 1}})
        );

        let err: ApiResponse<serde_json::Value> =
            ApiResponse::error(ErrorCode::Unauthorized, "Invalid credentials");
        let value = serde_json::to_value(&err).expect("Failed to serialize");
        assert_eq!(
            value,
            json!({"success": false, "code": "UNAUTHORIZED", "error": "Invalid credentials"})
        );
    }

    #[test]
    fn test_session_cookie_extraction() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "auth.session", "sealed-value", 3600)
            .expect("Failed to set cookie");
        let response = AuthResponse {
            status: StatusCode::OK,
            body: ApiResponse::ok(json!(null)),
            headers,
        };

        assert_eq!(
            response.session_cookie("auth.session").as_deref(),
            Some("sealed-value")
        );
        assert!(response.session_cookie("other.cookie").is_none());
    }

    #[test]
    fn test_session_cookie_absent() {
        let response = AuthResponse {
            status: StatusCode::OK,
            body: ApiResponse::ok(json!(null)),
            headers: HeaderMap::new(),
        };
        assert!(response.session_cookie("auth.session").is_none());
    }
}
