//! Shared Diesel error classification for the store adapters.
//!
//! Adapters run their multi-statement writes inside transaction closures
//! that fail with [`TxError`]; each adapter then maps that into its port
//! error enum. Serialization failures are retried once before they surface
//! as conflicts.

use rust_decimal::Decimal;
use tracing::debug;

use super::pool::PoolError;

/// Failure inside a store transaction.
///
/// Domain-flavoured variants short-circuit the transaction (rolling it
/// back); `Db` wraps the underlying Diesel failure.
#[derive(Debug, thiserror::Error)]
pub(crate) enum TxError {
    #[error(transparent)]
    Db(#[from] diesel::result::Error),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("balance {balance} cannot cover {amount}")]
    InsufficientFunds { balance: Decimal, amount: Decimal },
    #[error("inventory holds {have}, need {need}")]
    InsufficientQuantity { have: i32, need: i32 },
    #[error("{0} not found")]
    Missing(&'static str),
    #[error("goal is already completed")]
    GoalCompleted,
    #[error("character is not a starter character")]
    NotStarter,
    #[error("tamagotchi already exists")]
    TamagotchiExists,
    #[error("food is not in the inventory")]
    NotOwned,
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl TxError {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }

    /// Whether rerunning the transaction once may succeed.
    pub(crate) fn is_serialization_failure(&self) -> bool {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};
        matches!(
            self,
            Self::Db(DieselError::DatabaseError(
                DatabaseErrorKind::SerializationFailure,
                _
            ))
        )
    }
}

/// Port-error bucket for infrastructure failures.
pub(crate) enum TxErrorClass {
    Connection(String),
    Conflict(String),
    Query(String),
}

/// Bucket a transaction failure for the generic port-error variants.
///
/// Adapters match their domain-flavoured variants first and feed the rest
/// through here. A serialization failure reaching this point has already
/// used up its retry, so it surfaces as a conflict.
pub(crate) fn classify_tx(error: TxError) -> TxErrorClass {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        TxError::Pool(pool_error) => {
            TxErrorClass::Connection(map_pool_error(pool_error, |message| message))
        }
        TxError::Db(DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _)) => {
            TxErrorClass::Conflict("concurrent update lost after retry".to_owned())
        }
        TxError::Db(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            TxErrorClass::Conflict("conflicting concurrent update".to_owned())
        }
        TxError::Db(db_error) => {
            let (message, is_connection) = describe_diesel_error(&db_error);
            if is_connection {
                TxErrorClass::Connection(message.to_owned())
            } else {
                TxErrorClass::Query(message.to_owned())
            }
        }
        other => TxErrorClass::Query(other.to_string()),
    }
}

/// Split a Diesel failure into the message strings the port errors carry.
///
/// `NotFound` is deliberately not special-cased here; adapters that expect
/// absence use `.optional()` and handle it before mapping.
pub(crate) fn describe_diesel_error(error: &diesel::result::Error) -> (&'static str, bool) {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ("database connection error", true)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ("conflicting concurrent update", false)
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            ("storage constraint violated", false)
        }
        DieselError::NotFound => ("record not found", false),
        _ => ("database error", false),
    }
}

/// Map a Diesel failure through query/connection constructors, for reads
/// that run outside a transaction scope.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    let (message, is_connection) = describe_diesel_error(&error);
    if is_connection {
        connection(message)
    } else {
        query(message)
    }
}

/// Map pool checkout/build failures into a connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn db_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("boom".to_owned()))
    }

    #[rstest]
    fn serialization_failures_are_retryable() {
        let err = TxError::from(db_error(DatabaseErrorKind::SerializationFailure));
        assert!(err.is_serialization_failure());
    }

    #[rstest]
    fn unique_violations_are_not_retryable() {
        let err = TxError::from(db_error(DatabaseErrorKind::UniqueViolation));
        assert!(!err.is_serialization_failure());
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let (message, is_connection) =
            describe_diesel_error(&db_error(DatabaseErrorKind::ClosedConnection));
        assert!(is_connection);
        assert_eq!(message, "database connection error");
    }

    #[rstest]
    fn other_failures_map_to_query_errors() {
        let mapped: Result<(), &'static str> = Err(map_diesel_error(
            DieselError::NotFound,
            |m| m,
            |_| "connection",
        ));
        assert_eq!(mapped, Err("record not found"));
    }
}
