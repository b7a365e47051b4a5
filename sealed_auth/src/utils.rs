use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::header::{HeaderMap, SET_COOKIE};
use ring::rand::SecureRandom;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

pub(crate) fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

pub(crate) fn gen_random_bytes(len: usize) -> Result<Vec<u8>, UtilError> {
    let rng = ring::rand::SystemRandom::new();
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(buf)
}

pub(crate) fn header_set_cookie<'a>(
    headers: &'a mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
) -> Result<&'a HeaderMap, UtilError> {
    let cookie =
        format!("{name}={value}; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age={max_age}");
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64url_roundtrip() {
        let data = b"sealed-auth test data";
        let encoded = base64url_encode(data);
        let decoded = base64url_decode(&encoded).expect("Failed to decode");
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_base64url_decode_rejects_invalid_input() {
        let result = base64url_decode("not!valid!base64url!");
        assert!(matches!(result, Err(UtilError::Format(_))));
    }

    #[test]
    fn test_gen_random_bytes_length_and_uniqueness() {
        let a = gen_random_bytes(16).expect("Failed to generate bytes");
        let b = gen_random_bytes(16).expect("Failed to generate bytes");
        assert_eq!(a.len(), 16);
        assert_eq!(b.len(), 16);
        assert_ne!(a, b);
    }

    #[test]
    fn test_header_set_cookie_appends_attributes() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "auth.session", "abc123", 3600)
            .expect("Failed to set cookie");

        let cookie = headers
            .get(SET_COOKIE)
            .expect("Missing set-cookie header")
            .to_str()
            .expect("Invalid header value");
        assert!(cookie.starts_with("auth.session=abc123;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_header_set_cookie_expiry() {
        let mut headers = HeaderMap::new();
        header_set_cookie(&mut headers, "auth.session", "", -86400).expect("Failed to set cookie");

        let cookie = headers
            .get(SET_COOKIE)
            .expect("Missing set-cookie header")
            .to_str()
            .expect("Invalid header value");
        assert!(cookie.contains("Max-Age=-86400"));
    }
}
