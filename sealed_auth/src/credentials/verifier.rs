//! Keyed password hashing and verification.
//!
//! Hashes are HMAC-SHA256 digests keyed with the server secret over a random
//! per-hash salt and the password, stored as `s1$<salt>$<digest>` with
//! base64url components. Verification recomputes the digest and compares in
//! constant time; a malformed or missing hash is the same failure as a
//! mismatch, so callers cannot distinguish the two.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::utils::{base64url_decode, base64url_encode, gen_random_bytes};

use super::errors::CredentialsError;

type HmacSha256 = Hmac<Sha256>;

const HASH_SCHEME: &str = "s1";
const SALT_LEN: usize = 16;

/// Hash a password with the server secret for storage on an account.
pub(crate) fn hash_password(password: &str, secret: &[u8]) -> Result<String, CredentialsError> {
    let salt = gen_random_bytes(SALT_LEN)?;
    let digest = keyed_digest(&salt, password, secret);
    Ok(format!(
        "{HASH_SCHEME}${}${}",
        base64url_encode(&salt),
        base64url_encode(&digest)
    ))
}

/// Check a candidate password against a stored hash.
///
/// Returns true only if the hash parses and the digests match.
pub(crate) fn verify_password(candidate: &str, stored_hash: &str, secret: &[u8]) -> bool {
    let Some((salt, digest)) = parse_hash(stored_hash) else {
        return false;
    };
    let computed = keyed_digest(&salt, candidate, secret);
    computed.ct_eq(&digest).into()
}

fn keyed_digest(salt: &[u8], password: &str, secret: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(salt);
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn parse_hash(stored_hash: &str) -> Option<(Vec<u8>, Vec<u8>)> {
    let mut parts = stored_hash.splitn(3, '$');
    let scheme = parts.next()?;
    if scheme != HASH_SCHEME {
        return None;
    }
    let salt = base64url_decode(parts.next()?).ok()?;
    let digest = base64url_decode(parts.next()?).ok()?;
    if salt.is_empty() || digest.is_empty() {
        return None;
    }
    Some((salt, digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"an example very very secret key.";

    #[test]
    fn test_hash_then_verify_succeeds() {
        let hash = hash_password("sup3r-secret", SECRET).expect("Failed to hash");
        assert!(verify_password("sup3r-secret", &hash, SECRET));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("sup3r-secret", SECRET).expect("Failed to hash");
        assert!(!verify_password("wrong-password", &hash, SECRET));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let hash = hash_password("sup3r-secret", SECRET).expect("Failed to hash");
        assert!(!verify_password(
            "sup3r-secret",
            &hash,
            b"a different very very secret key"
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("sup3r-secret", SECRET).expect("Failed to hash");
        let b = hash_password("sup3r-secret", SECRET).expect("Failed to hash");
        assert_ne!(a, b);
        assert!(verify_password("sup3r-secret", &a, SECRET));
        assert!(verify_password("sup3r-secret", &b, SECRET));
    }

    #[test]
    fn test_verify_rejects_malformed_hashes() {
        for stored in [
            "",
            "s1",
            "s1$",
            "s1$$",
            "s1$only-one-part",
            "s2$YWJj$YWJj",
            "plain-text-hash",
            "s1$not!b64$YWJj",
        ] {
            assert!(
                !verify_password("sup3r-secret", stored, SECRET),
                "hash {stored:?} should not verify"
            );
        }
    }

    proptest! {
        /// Any password survives a hash/verify roundtrip with the right
        /// secret and fails with a different password.
        #[test]
        fn test_verify_roundtrip_properties(
            password in "\\PC{1,64}",
            other in "\\PC{1,64}",
        ) {
            let hash = hash_password(&password, SECRET).expect("Failed to hash");
            prop_assert!(verify_password(&password, &hash, SECRET));
            if other != password {
                prop_assert!(!verify_password(&other, &hash, SECRET));
            }
        }
    }
}
