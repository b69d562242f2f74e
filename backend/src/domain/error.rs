//! Domain error representation shared across adapters.
//!
//! Keep this module free from HTTP or framework concerns so the same error
//! shape can be mapped by any adapter. The HTTP layer owns the response
//! envelope; this type carries the stable kind, the message, and optional
//! field-level validation details.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The operation conflicts with existing state.
    Conflict,
    /// The adventure choice was already submitted.
    AlreadySubmitted,
    /// The goal was already completed.
    AlreadyCompleted,
    /// A monetary amount is zero, negative, or malformed.
    InvalidAmount,
    /// The adventure choice index is out of range.
    InvalidChoice,
    /// The chosen character is not a starter character.
    InvalidStarter,
    /// The wallet balance does not cover the debit.
    InsufficientFunds,
    /// The inventory does not hold enough of the item.
    InsufficientQuantity,
    /// No mission is active for today's UTC date.
    NoActiveMission,
    /// The request failed field-level validation.
    ValidationFailed,
    /// A downstream dependency (AI service, database pool) is unavailable.
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    Internal,
}

impl ErrorCode {
    /// Short kind name used in the response envelope's `error` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::AlreadySubmitted => "already_submitted",
            Self::AlreadyCompleted => "already_completed",
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidChoice => "invalid_choice",
            Self::InvalidStarter => "invalid_starter",
            Self::InsufficientFunds => "insufficient_funds",
            Self::InsufficientQuantity => "insufficient_quantity",
            Self::NoActiveMission => "no_active_mission",
            Self::ValidationFailed => "validation_failed",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Internal => "internal",
        }
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain error payload consumed by adapters.
///
/// ## Invariants
/// - `message` is non-empty.
/// - `validation_errors` is non-empty only for [`ErrorCode::ValidationFailed`].
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    validation_errors: Vec<FieldError>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            validation_errors: Vec::new(),
        }
    }

    /// Stable machine-readable error kind.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Field-level details for validation failures.
    pub fn validation_errors(&self) -> &[FieldError] {
        &self.validation_errors
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn already_submitted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadySubmitted, message)
    }

    pub fn already_completed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyCompleted, message)
    }

    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAmount, message)
    }

    pub fn invalid_choice(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidChoice, message)
    }

    pub fn invalid_starter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidStarter, message)
    }

    pub fn insufficient_funds(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientFunds, message)
    }

    pub fn insufficient_quantity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientQuantity, message)
    }

    pub fn no_active_mission(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NoActiveMission, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Build a validation failure from field-level details.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: "Validation failed".to_owned(),
            validation_errors: errors,
        }
    }

    /// Build a single-field validation failure.
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::InsufficientFunds, "insufficient_funds")]
    #[case(ErrorCode::AlreadySubmitted, "already_submitted")]
    #[case(ErrorCode::NoActiveMission, "no_active_mission")]
    #[case(ErrorCode::ValidationFailed, "validation_failed")]
    fn code_names_are_stable(#[case] code: ErrorCode, #[case] expected: &str) {
        assert_eq!(code.as_str(), expected);
    }

    #[rstest]
    fn validation_carries_field_details() {
        let err = Error::validation_field("age", "must be between 5 and 18");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.validation_errors().len(), 1);
        assert_eq!(err.validation_errors()[0].field, "age");
    }

    #[rstest]
    fn display_uses_message() {
        let err = Error::insufficient_funds("balance 10 cannot cover 15");
        assert_eq!(err.to_string(), "balance 10 cannot cover 15");
    }
}
