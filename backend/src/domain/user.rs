//! User account model and registration validation.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{Error, FieldError};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Registered account.
///
/// `username` and `email` are unique and immutable after registration.
/// The password is only ever held as a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated registration payload, ready for hashing and insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
}

impl Registration {
    /// Validate raw registration input.
    ///
    /// Collects all field failures rather than stopping at the first, so
    /// clients can render the full set at once.
    pub fn new(username: &str, email: &str, password: &str) -> Result<Self, Error> {
        let mut failures = Vec::new();
        let username = username.trim();
        let email = email.trim();

        if username.len() < USERNAME_MIN_LEN || username.len() > USERNAME_MAX_LEN {
            failures.push(FieldError::new(
                "username",
                format!("must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters"),
            ));
        }
        if !is_plausible_email(email) {
            failures.push(FieldError::new("email", "must be a valid e-mail address"));
        }
        if password.len() < PASSWORD_MIN_LEN {
            failures.push(FieldError::new(
                "password",
                format!("must be at least {PASSWORD_MIN_LEN} characters"),
            ));
        }

        if failures.is_empty() {
            Ok(Self {
                username: username.to_owned(),
                email: email.to_owned(),
                password: password.to_owned(),
            })
        } else {
            Err(Error::validation(failures))
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Cheap structural e-mail check: one `@` with non-empty local and domain
/// parts. Deliverability is the mail system's problem.
fn is_plausible_email(raw: &str) -> bool {
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !raw.contains(' ') && !domain.contains('@')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("k@example.com")]
    #[case("k@x")]
    fn accepts_valid_registration(#[case] email: &str) {
        let reg = Registration::new("kid", email, "Secret123").expect("valid");
        assert_eq!(reg.username(), "kid");
        assert_eq!(reg.email(), email);
    }

    #[rstest]
    #[case("ab", "k@example.com", "Secret123", "username")]
    #[case("kid", "not-an-email", "Secret123", "email")]
    #[case("kid", "@nodomain", "Secret123", "email")]
    #[case("kid", "k@example.com", "short", "password")]
    fn rejects_invalid_fields(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let err = Registration::new(username, email, password).expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(err.validation_errors().iter().any(|f| f.field == field));
    }

    #[rstest]
    fn collects_every_failing_field() {
        let err = Registration::new("x", "bad", "pw").expect_err("invalid");
        assert_eq!(err.validation_errors().len(), 3);
    }

    #[rstest]
    fn trims_whitespace_around_identity_fields() {
        let reg = Registration::new("  kid  ", " k@example.com ", "Secret123").expect("valid");
        assert_eq!(reg.username(), "kid");
        assert_eq!(reg.email(), "k@example.com");
    }
}
