//! PostgreSQL-backed `GoalStore` implementation using Diesel.
//!
//! `add_progress` locks the goal row with `FOR UPDATE`, applies the
//! contribution through the domain transition, and credits the completion
//! bonus under the same lock, so concurrent contributions that cross the
//! target cannot double-credit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::goal::{self, Goal, GoalDraft, GoalProgressOutcome};
use crate::domain::ports::{GoalFilter, GoalStore, GoalStoreError};
use crate::domain::wallet::TransactionKind;

use super::error_mapping::{classify_tx, TxError, TxErrorClass};
use super::models::{GoalRow, NewGoalRow};
use super::pool::DbPool;
use super::schema::goals;
use super::wallet_ops;

#[derive(Clone)]
pub struct DieselGoalStore {
    pool: DbPool,
}

impl DieselGoalStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run_add_progress(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<GoalProgressOutcome, TxError> {
        let mut conn = self.pool.get().await?;
        conn.transaction(|conn| {
            async move {
                let row: Option<GoalRow> = goals::table
                    .filter(goals::id.eq(goal_id).and(goals::user_id.eq(user_id)))
                    .select(GoalRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let row = row.ok_or(TxError::Missing("goal"))?;
                if row.completed {
                    return Err(TxError::GoalCompleted);
                }

                let mut goal = goal_from_row(row);
                let outcome = goal::apply_progress(&mut goal, amount, now);

                diesel::update(goals::table.filter(goals::id.eq(goal.id)))
                    .set((
                        goals::current_amount.eq(goal.current_amount),
                        goals::completed.eq(goal.completed),
                        goals::completed_at.eq(goal.completed_at),
                        goals::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                if let Some(bonus) = outcome.bonus_awarded {
                    wallet_ops::credit_in_tx(
                        conn,
                        user_id,
                        bonus,
                        TransactionKind::GoalBonus,
                        Some(format!("Completed goal: {}", goal.title)),
                        now,
                    )
                    .await?;
                }

                Ok(outcome)
            }
            .scope_boxed()
        })
        .await
    }
}

fn goal_from_row(row: GoalRow) -> Goal {
    Goal {
        id: row.id,
        user_id: row.user_id,
        title: row.title,
        description: row.description,
        target_amount: row.target_amount,
        current_amount: row.current_amount,
        completed: row.completed,
        completed_at: row.completed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn map_tx_error(error: TxError) -> GoalStoreError {
    match error {
        TxError::Missing("goal") => GoalStoreError::goal_not_found(),
        TxError::GoalCompleted => GoalStoreError::already_completed(),
        other => match classify_tx(other) {
            TxErrorClass::Connection(message) => GoalStoreError::connection(message),
            TxErrorClass::Conflict(message) => GoalStoreError::conflict(message),
            TxErrorClass::Query(message) => GoalStoreError::query(message),
        },
    }
}

#[async_trait]
impl GoalStore for DieselGoalStore {
    async fn create(
        &self,
        user_id: Uuid,
        draft: GoalDraft,
        _now: DateTime<Utc>,
    ) -> Result<Goal, GoalStoreError> {
        let result: Result<GoalRow, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(diesel::insert_into(goals::table)
                .values(NewGoalRow {
                    id: Uuid::new_v4(),
                    user_id,
                    title: draft.title,
                    description: draft.description,
                    target_amount: draft.target_amount,
                    current_amount: Decimal::ZERO,
                    completed: false,
                })
                .returning(GoalRow::as_returning())
                .get_result(&mut conn)
                .await?)
        }
        .await;
        result.map(goal_from_row).map_err(map_tx_error)
    }

    async fn list(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>, GoalStoreError> {
        let rows: Result<Vec<GoalRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            let query = goals::table
                .filter(goals::user_id.eq(user_id))
                .order((goals::created_at.desc(), goals::id.desc()))
                .select(GoalRow::as_select());
            let rows = match filter {
                GoalFilter::All => query.load(&mut conn).await?,
                GoalFilter::Active => {
                    query
                        .filter(goals::completed.eq(false))
                        .load(&mut conn)
                        .await?
                }
                GoalFilter::Completed => {
                    query
                        .filter(goals::completed.eq(true))
                        .load(&mut conn)
                        .await?
                }
            };
            Ok(rows)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(goal_from_row)
            .collect())
    }

    async fn add_progress(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<GoalProgressOutcome, GoalStoreError> {
        let first = self.run_add_progress(goal_id, user_id, amount, now).await;
        match first {
            Err(error) if error.is_serialization_failure() => self
                .run_add_progress(goal_id, user_id, amount, now)
                .await
                .map_err(map_tx_error),
            other => other.map_err(map_tx_error),
        }
    }

    async fn delete(&self, goal_id: Uuid, user_id: Uuid) -> Result<(), GoalStoreError> {
        let result: Result<usize, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(diesel::delete(
                goals::table.filter(goals::id.eq(goal_id).and(goals::user_id.eq(user_id))),
            )
            .execute(&mut conn)
            .await?)
        }
        .await;
        match result.map_err(map_tx_error)? {
            0 => Err(GoalStoreError::goal_not_found()),
            _ => Ok(()),
        }
    }

    async fn recent_incomplete(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Goal>, GoalStoreError> {
        let rows: Result<Vec<GoalRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(goals::table
                .filter(goals::user_id.eq(user_id).and(goals::completed.eq(false)))
                .order((goals::created_at.desc(), goals::id.desc()))
                .limit(limit)
                .select(GoalRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(goal_from_row)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_goal_maps_to_goal_not_found() {
        assert_eq!(
            map_tx_error(TxError::Missing("goal")),
            GoalStoreError::goal_not_found()
        );
    }

    #[rstest]
    fn completed_goal_maps_to_already_completed() {
        assert_eq!(
            map_tx_error(TxError::GoalCompleted),
            GoalStoreError::already_completed()
        );
    }

    #[rstest]
    fn serialization_failures_map_to_conflict_after_the_retry() {
        let err = map_tx_error(TxError::from(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::SerializationFailure,
            Box::new("serialize".to_owned()),
        )));
        assert!(matches!(err, GoalStoreError::Conflict { .. }));
    }
}
