//! Password digests (Argon2id, PHC string format).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use tracing::error;

use crate::error::{DbError, DbResult};

/// Computes a salted one-way digest of `plain`.
pub fn hash_password(plain: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            DbError::PasswordDigest(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Checks `plain` against a stored digest.
///
/// A malformed digest is an error; a mismatch is `Ok(false)`.
pub fn verify_password(plain: &str, digest: &str) -> DbResult<bool> {
    let parsed = PasswordHash::new(digest).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        DbError::PasswordDigest(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Burns the same verify cost as a real login when the username is unknown,
/// so response time doesn't reveal which usernames exist.
pub(crate) fn verify_against_dummy(plain: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    if let Some(digest) = DUMMY.get_or_init(|| hash_password("ecotrack-dummy").ok()) {
        let _ = verify_password(plain, digest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("1234").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("1234", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        assert_ne!(hash_password("1234").unwrap(), hash_password("1234").unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, DbError::PasswordDigest(_)));
    }
}
