//! PostgreSQL-backed `UserRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NewUserRecord, UserRepository, UserRepositoryError};
use crate::domain::user::User;

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Distinguish which unique index a registration insert tripped on.
fn map_insert_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) = error {
        let constraint = info.constraint_name().unwrap_or_default();
        if constraint.contains("email") {
            return UserRepositoryError::duplicate_email();
        }
        return UserRepositoryError::duplicate_username();
    }
    map_diesel(error)
}

fn user_from_row(row: UserRow) -> User {
    User {
        id: row.id,
        username: row.username,
        email: row.email,
        password_hash: row.password_hash,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow {
                id: record.id,
                username: record.username,
                email: record.email,
                password_hash: record.password_hash,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_error)?;
        Ok(user_from_row(row))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(user_from_row))
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        Ok(row.map(user_from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_map_to_connection() {
        let err = map_pool(PoolError::checkout("refused"));
        assert!(matches!(err, UserRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("refused"));
    }

    #[rstest]
    fn plain_diesel_errors_map_to_query() {
        let err = map_diesel(diesel::result::Error::NotFound);
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }
}
