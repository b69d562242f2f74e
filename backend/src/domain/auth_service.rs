//! Registration and login service.
//!
//! Password hashing and credential issuance sit behind ports; this service
//! owns the validation and the account lookup flow.

use std::sync::Arc;

use uuid::Uuid;

use super::error::Error;
use super::ports::{
    NewUserRecord, PasswordHasher, TokenService, UserRepository, UserRepositoryError,
};
use super::user::Registration;

/// Successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Create an account and hand back its first credential.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, Error> {
        let registration = Registration::new(username, email, password)?;
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(|err| Error::internal(err.to_string()))?;

        let user = self
            .users
            .create(NewUserRecord {
                id: Uuid::new_v4(),
                username: registration.username().to_owned(),
                email: registration.email().to_owned(),
                password_hash,
            })
            .await
            .map_err(map_user_repository_error)?;

        self.issue(user.id)
    }

    /// Exchange a username and password for a credential.
    ///
    /// The failure message never reveals whether the username exists.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthenticatedUser, Error> {
        let rejected = || Error::unauthorized("invalid username or password");

        let user = self
            .users
            .find_by_username(username.trim())
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(rejected)?;

        let verified = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|err| Error::internal(err.to_string()))?;
        if !verified {
            return Err(rejected());
        }

        self.issue(user.id)
    }

    fn issue(&self, user_id: Uuid) -> Result<AuthenticatedUser, Error> {
        let token = self
            .tokens
            .issue(user_id)
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(AuthenticatedUser { user_id, token })
    }
}

fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::DuplicateUsername => Error::conflict("username is already taken"),
        UserRepositoryError::DuplicateEmail => {
            Error::conflict("e-mail address is already registered")
        }
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::fixtures::{
        FixturePasswordHasher, FixtureTokenService, FixtureUserRepository, FIXTURE_USER_ID,
    };
    use crate::domain::ports::user_repository::MockUserRepository;
    use rstest::rstest;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(FixtureUserRepository),
            Arc::new(FixturePasswordHasher),
            Arc::new(FixtureTokenService),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn register_returns_user_and_token() {
        let auth = service()
            .register("newkid", "n@example.com", "Secret123")
            .await
            .expect("registers");
        assert!(auth.token.starts_with("fixture-token-"));
    }

    #[rstest]
    #[tokio::test]
    async fn register_rejects_invalid_input_before_hashing() {
        let err = service()
            .register("x", "bad", "pw")
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_username_maps_to_conflict() {
        let mut users = MockUserRepository::new();
        users
            .expect_create()
            .returning(|_| Err(UserRepositoryError::duplicate_username()));
        let service = AuthService::new(
            Arc::new(users),
            Arc::new(FixturePasswordHasher),
            Arc::new(FixtureTokenService),
        );

        let err = service
            .register("newkid", "n@example.com", "Secret123")
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn login_succeeds_with_matching_password() {
        let auth = service().login("kid", "Secret123").await.expect("logs in");
        assert_eq!(auth.user_id, FIXTURE_USER_ID);
    }

    #[rstest]
    #[case("kid", "WrongPass1")]
    #[case("nobody", "Secret123")]
    #[tokio::test]
    async fn login_failures_are_uniform(#[case] username: &str, #[case] password: &str) {
        let err = service()
            .login(username, password)
            .await
            .expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid username or password");
    }
}
