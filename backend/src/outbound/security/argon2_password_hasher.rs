//! Argon2id password hashing adapter.
//!
//! Hashes are stored as self-describing PHC strings, so parameter upgrades
//! verify old hashes transparently.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;

use crate::domain::ports::{PasswordHasher, PasswordHasherError};

#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHasherError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| PasswordHasherError::malformed_hash(err.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hashes_verify_and_mismatches_fail() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash("Secret123").expect("hashes");

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("Secret123", &hash).expect("verifies"));
        assert!(!hasher.verify("WrongPass1", &hash).expect("verifies"));
    }

    #[rstest]
    fn two_hashes_of_the_same_password_differ() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("Secret123").expect("hashes");
        let second = hasher.hash("Secret123").expect("hashes");
        assert_ne!(first, second, "salts must differ");
    }

    #[rstest]
    fn malformed_stored_hashes_are_reported() {
        let hasher = Argon2PasswordHasher::new();
        let err = hasher
            .verify("Secret123", "not-a-phc-string")
            .expect_err("malformed");
        assert!(matches!(err, PasswordHasherError::MalformedHash { .. }));
    }
}
