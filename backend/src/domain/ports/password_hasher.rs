//! Port for password hashing.

use super::macros::port_error;

port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed (bad parameters, RNG failure).
        Hash { message } => "password hashing failed: {message}",
        /// The stored hash could not be parsed for verification.
        MalformedHash { message } => "stored password hash is malformed: {message}",
    }
}

/// Port for one-way password hashing and verification.
///
/// Hashing is CPU-bound and synchronous; callers on async paths accept the
/// short stall, matching the request rates this system serves.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Verify a plaintext password against a stored PHC string.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}
