use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must not be empty")]
    Empty,
    #[error("password exceeds the maximum of {0} bytes")]
    TooLong(usize),
    #[error("stored password hash is malformed")]
    CorruptHash,
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id hasher with an input-length policy. Built once at startup and
/// injected through `AppState`.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    max_len: usize,
}

impl PasswordHasher {
    pub fn new(max_len: usize) -> Self {
        Self {
            argon2: Argon2::default(),
            max_len,
        }
    }

    /// Salted one-way hash. Output differs per call; verification does not.
    pub fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        if plain.is_empty() {
            return Err(PasswordError::Empty);
        }
        if plain.len() > self.max_len {
            return Err(PasswordError::TooLong(self.max_len));
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                PasswordError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Verify `plain` against a stored PHC-format hash. A mismatch is
    /// `Ok(false)`, never an error; an unparseable hash is `CorruptHash`.
    pub fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            PasswordError::CorruptHash
        })?;
        Ok(self
            .argon2
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(128)
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hasher().hash(password).expect("hashing should succeed");
        assert!(hasher().verify(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hasher().hash(password).expect("hashing should succeed");
        assert!(!hasher()
            .verify("wrong-password", &hash)
            .expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = hasher().verify("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, PasswordError::CorruptHash));
    }

    #[test]
    fn hash_is_salted() {
        let h = hasher();
        let first = h.hash("same-password").expect("hashing should succeed");
        let second = h.hash("same-password").expect("hashing should succeed");
        assert_ne!(first, second);
        assert!(h.verify("same-password", &first).unwrap());
        assert!(h.verify("same-password", &second).unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(matches!(hasher().hash(""), Err(PasswordError::Empty)));
    }

    #[test]
    fn oversized_password_is_rejected() {
        let long = "x".repeat(129);
        assert!(matches!(hasher().hash(&long), Err(PasswordError::TooLong(128))));
    }
}
