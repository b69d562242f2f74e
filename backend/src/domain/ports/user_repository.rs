//! Port for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::user::User;

use super::macros::port_error;

port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The username is already registered.
        DuplicateUsername => "username is already taken",
        /// The e-mail address is already registered.
        DuplicateEmail => "e-mail address is already registered",
        /// Repository connection could not be established.
        Connection { message } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "user repository query failed: {message}",
    }
}

/// Insert payload for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Port for creating and looking up accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account; uniqueness races surface as duplicate errors.
    async fn create(&self, record: NewUserRecord) -> Result<User, UserRepositoryError>;

    /// Look up an account by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Look up an account by id.
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError>;
}
