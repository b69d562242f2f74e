//! PostgreSQL-backed `MissionStore` implementation using Diesel.
//!
//! The activity loggers insert the activity row and advance the day's
//! mission (including the reward credit) in one transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::activity::{Expense, ExpenseDraft, Saving, SavingDraft};
use crate::domain::mission::MissionEvent;
use crate::domain::ports::{
    ExpenseLogged, MissionStore, MissionStoreError, SavingLogged, TodaysMission,
};

use super::error_mapping::{classify_tx, TxError, TxErrorClass};
use super::mission_ops;
use super::models::{ExpenseRow, NewExpenseRow, NewSavingRow, SavingRow};
use super::pool::DbPool;
use super::schema::{expenses, savings};

#[derive(Clone)]
pub struct DieselMissionStore {
    pool: DbPool,
}

impl DieselMissionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run_log_expense(
        &self,
        user_id: Uuid,
        draft: &ExpenseDraft,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ExpenseLogged, TxError> {
        let mut conn = self.pool.get().await?;
        let draft = draft.clone();
        conn.transaction(|conn| {
            async move {
                let row: ExpenseRow = diesel::insert_into(expenses::table)
                    .values(NewExpenseRow {
                        id: Uuid::new_v4(),
                        user_id,
                        amount: draft.amount,
                        category: draft.category,
                        description: draft.description,
                        logged_at: now,
                    })
                    .returning(ExpenseRow::as_returning())
                    .get_result(conn)
                    .await?;

                let mission = mission_ops::apply_mission_event_in_tx(
                    conn,
                    user_id,
                    MissionEvent::ExpenseLogged,
                    day,
                    now,
                )
                .await?;

                Ok(ExpenseLogged {
                    expense: expense_from_row(row),
                    mission,
                })
            }
            .scope_boxed()
        })
        .await
    }

    async fn run_log_saving(
        &self,
        user_id: Uuid,
        draft: &SavingDraft,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SavingLogged, TxError> {
        let mut conn = self.pool.get().await?;
        let draft = draft.clone();
        conn.transaction(|conn| {
            async move {
                let row: SavingRow = diesel::insert_into(savings::table)
                    .values(NewSavingRow {
                        id: Uuid::new_v4(),
                        user_id,
                        amount: draft.amount,
                        source: draft.source,
                        logged_at: now,
                    })
                    .returning(SavingRow::as_returning())
                    .get_result(conn)
                    .await?;

                let mission = mission_ops::apply_mission_event_in_tx(
                    conn,
                    user_id,
                    MissionEvent::SavingLogged,
                    day,
                    now,
                )
                .await?;

                Ok(SavingLogged {
                    saving: saving_from_row(row),
                    mission,
                })
            }
            .scope_boxed()
        })
        .await
    }
}

fn expense_from_row(row: ExpenseRow) -> Expense {
    Expense {
        id: row.id,
        user_id: row.user_id,
        amount: row.amount,
        category: row.category,
        description: row.description,
        logged_at: row.logged_at,
    }
}

fn saving_from_row(row: SavingRow) -> Saving {
    Saving {
        id: row.id,
        user_id: row.user_id,
        amount: row.amount,
        source: row.source,
        logged_at: row.logged_at,
    }
}

fn map_tx_error(error: TxError) -> MissionStoreError {
    match classify_tx(error) {
        TxErrorClass::Connection(message) => MissionStoreError::connection(message),
        TxErrorClass::Conflict(message) => MissionStoreError::conflict(message),
        TxErrorClass::Query(message) => MissionStoreError::query(message),
    }
}

#[async_trait]
impl MissionStore for DieselMissionStore {
    async fn todays_mission(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<TodaysMission>, MissionStoreError> {
        let result: Result<Option<TodaysMission>, TxError> = async {
            let mut conn = self.pool.get().await?;
            conn.transaction(|conn| {
                async move {
                    let Some(mission) = mission_ops::active_mission_in_tx(conn, day).await? else {
                        return Ok(None);
                    };
                    let record =
                        mission_ops::lock_or_create_user_mission(conn, user_id, mission.id)
                            .await?;
                    let progress_pct = if record.completed {
                        100
                    } else {
                        mission.kind.progress_pct(&record.progress)
                    };
                    Ok(Some(TodaysMission {
                        mission,
                        record,
                        progress_pct,
                    }))
                }
                .scope_boxed()
            })
            .await
        }
        .await;
        result.map_err(map_tx_error)
    }

    async fn log_expense(
        &self,
        user_id: Uuid,
        draft: ExpenseDraft,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ExpenseLogged, MissionStoreError> {
        let first = self.run_log_expense(user_id, &draft, day, now).await;
        match first {
            Err(error) if error.is_serialization_failure() => self
                .run_log_expense(user_id, &draft, day, now)
                .await
                .map_err(map_tx_error),
            other => other.map_err(map_tx_error),
        }
    }

    async fn log_saving(
        &self,
        user_id: Uuid,
        draft: SavingDraft,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SavingLogged, MissionStoreError> {
        let first = self.run_log_saving(user_id, &draft, day, now).await;
        match first {
            Err(error) if error.is_serialization_failure() => self
                .run_log_saving(user_id, &draft, day, now)
                .await
                .map_err(map_tx_error),
            other => other.map_err(map_tx_error),
        }
    }

    async fn list_expenses(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Expense>, MissionStoreError> {
        let rows: Result<Vec<ExpenseRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(expenses::table
                .filter(expenses::user_id.eq(user_id))
                .order((expenses::logged_at.desc(), expenses::id.desc()))
                .limit(limit)
                .select(ExpenseRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(expense_from_row)
            .collect())
    }

    async fn list_savings(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Saving>, MissionStoreError> {
        let rows: Result<Vec<SavingRow>, TxError> = async {
            let mut conn = self.pool.get().await?;
            Ok(savings::table
                .filter(savings::user_id.eq(user_id))
                .order((savings::logged_at.desc(), savings::id.desc()))
                .limit(limit)
                .select(SavingRow::as_select())
                .load(&mut conn)
                .await?)
        }
        .await;
        Ok(rows
            .map_err(map_tx_error)?
            .into_iter()
            .map(saving_from_row)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn serialization_failures_map_to_conflict_after_the_retry() {
        let err = map_tx_error(TxError::from(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::SerializationFailure,
            Box::new("serialize".to_owned()),
        )));
        assert!(matches!(err, MissionStoreError::Conflict { .. }));
    }

    #[rstest]
    fn corrupt_mission_rows_map_to_query_errors() {
        let err = map_tx_error(TxError::corrupt("mission x: unknown mission type tag"));
        assert!(matches!(err, MissionStoreError::Query { .. }));
    }
}
