//! Player profile and onboarding state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{Error, FieldError};
use super::money;

pub const MIN_AGE: i32 = 5;
pub const MAX_AGE: i32 = 18;
pub const DEFAULT_CURRENCY: &str = "IDR";

/// Player profile, one per user.
///
/// `onboarding_completed` flips to true exactly when the starter character
/// is chosen and never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub allowance: Decimal,
    pub currency: String,
    pub onboarding_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated profile creation payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub age: i32,
    pub allowance: Decimal,
    pub currency: String,
}

impl ProfileDraft {
    /// Validate raw profile input. The currency defaults to [`DEFAULT_CURRENCY`]
    /// and must otherwise be a 3-letter uppercase code.
    pub fn new(age: i32, allowance: Decimal, currency: Option<&str>) -> Result<Self, Error> {
        let mut failures = Vec::new();

        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            failures.push(FieldError::new(
                "age",
                format!("must be between {MIN_AGE} and {MAX_AGE}"),
            ));
        }

        let allowance = match money::require_positive("allowance", allowance) {
            Ok(normalised) => Some(normalised),
            Err(_) => {
                failures.push(FieldError::new("allowance", "must be greater than 0"));
                None
            }
        };

        let currency = currency.unwrap_or(DEFAULT_CURRENCY).trim().to_owned();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            failures.push(FieldError::new(
                "currency",
                "must be a 3-letter uppercase code",
            ));
        }

        match (failures.is_empty(), allowance) {
            (true, Some(allowance)) => Ok(Self {
                age,
                allowance,
                currency,
            }),
            _ => Err(Error::validation(failures)),
        }
    }
}
