//! Port for the auth gate's bearer credential.
//!
//! The credential format is opaque to the domain: the gate only needs
//! `resolve(credential) -> user id` and `issue(user id) -> credential`.

use uuid::Uuid;

use super::macros::port_error;

port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// The credential is missing, malformed, expired, or forged.
        InvalidToken => "credential is invalid or expired",
        /// Token issuance failed.
        Issue { message } => "failed to issue credential: {message}",
    }
}

/// Port for issuing and resolving bearer credentials.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a credential identifying the user.
    fn issue(&self, user_id: Uuid) -> Result<String, TokenError>;

    /// Resolve a credential back to the user it identifies.
    fn resolve(&self, credential: &str) -> Result<Uuid, TokenError>;
}
