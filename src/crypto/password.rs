//! Salted password hashing.
//!
//! Hashes are stored as `pbkdf2_sha256$<iterations>$<salt>$<hash>` with
//! base64 (standard, unpadded) salt and hash. The iteration count travels with
//! the hash so it can be raised later without invalidating stored credentials.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::CryptoError;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 32;
pub const HASH_LENGTH: usize = 32;

const SCHEME: &str = "pbkdf2_sha256";

/// Hash a password with a fresh random salt and the default iteration count.
pub fn hash_password(password: &str) -> Result<String, CryptoError> {
    hash_password_with_iterations(password, PBKDF2_ITERATIONS)
}

/// Hash with an explicit iteration count. Seeding and tests use a low count.
pub fn hash_password_with_iterations(
    password: &str,
    iterations: u32,
) -> Result<String, CryptoError> {
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations);
    }
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);

    let derived = derive(password, &salt, iterations);
    Ok(format!(
        "{SCHEME}${iterations}${}${}",
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(derived.as_slice()),
    ))
}

/// Check `password` against a stored hash in constant time.
///
/// Returns `Ok(false)` on mismatch and `Err` only when the stored value is
/// not a hash this module produced.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CryptoError> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(CryptoError::MalformedHash);
    };

    if scheme != SCHEME {
        return Err(CryptoError::UnsupportedScheme(scheme.to_string()));
    }
    let iterations: u32 = iterations.parse().map_err(|_| CryptoError::MalformedHash)?;
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations);
    }
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| CryptoError::MalformedHash)?;
    let expected = STANDARD_NO_PAD
        .decode(expected)
        .map_err(|_| CryptoError::MalformedHash)?;
    if expected.len() != HASH_LENGTH {
        return Err(CryptoError::MalformedHash);
    }

    let derived = derive(password, &salt, iterations);
    Ok(derived.as_slice().ct_eq(expected.as_slice()).into())
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
    let mut out = Zeroizing::new([0u8; HASH_LENGTH]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out[..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password_with_iterations("password", FAST).unwrap();
        assert!(verify_password("password", &hash).unwrap());
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password_with_iterations("password", FAST).unwrap();
        assert!(!verify_password("Password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let h1 = hash_password_with_iterations("admin123", FAST).unwrap();
        let h2 = hash_password_with_iterations("admin123", FAST).unwrap();
        assert_ne!(h1, h2);
        assert!(verify_password("admin123", &h1).unwrap());
        assert!(verify_password("admin123", &h2).unwrap());
    }

    #[test]
    fn stored_format_carries_iterations() {
        let hash = hash_password_with_iterations("x", FAST).unwrap();
        assert!(hash.starts_with("pbkdf2_sha256$1000$"));
        assert_eq!(hash.split('$').count(), 4);
    }

    #[test]
    fn default_cost_is_applied() {
        let hash = hash_password("pw").unwrap();
        assert!(hash.starts_with(&format!("pbkdf2_sha256${PBKDF2_ITERATIONS}$")));
    }

    #[test]
    fn malformed_hashes_are_errors() {
        assert!(matches!(
            verify_password("pw", "plaintext"),
            Err(CryptoError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("pw", "bcrypt$10$abc$def"),
            Err(CryptoError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            verify_password("pw", "pbkdf2_sha256$many$abc$def"),
            Err(CryptoError::MalformedHash)
        ));
        assert!(matches!(
            verify_password("pw", "pbkdf2_sha256$1000$AAAA$AAAA"),
            Err(CryptoError::MalformedHash)
        ));
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(matches!(
            hash_password_with_iterations("pw", 0),
            Err(CryptoError::InvalidIterations)
        ));
    }
}
