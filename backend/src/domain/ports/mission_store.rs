//! Port for daily missions, activity logging, and mission progress.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::activity::{Expense, ExpenseDraft, Saving, SavingDraft};
use crate::domain::mission::{Mission, UserMission};

use super::macros::port_error;

port_error! {
    /// Errors raised by mission store adapters.
    pub enum MissionStoreError {
        /// A concurrent update won the race after the retry.
        Conflict { message } => "mission update conflicted: {message}",
        /// Repository connection could not be established.
        Connection { message } => "mission store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "mission store query failed: {message}",
    }
}

/// Mission side effect of one logged activity or feed.
///
/// `reward_credited` is set exactly when this event flipped the mission to
/// completed and the reward was credited in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionOutcome {
    pub mission_id: Uuid,
    pub progress_pct: u8,
    pub completed: bool,
    pub just_completed: bool,
    pub reward_credited: Option<Decimal>,
}

/// Today's mission with the caller's lazily created progress record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodaysMission {
    pub mission: Mission,
    pub record: UserMission,
    pub progress_pct: u8,
}

/// Result of logging an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseLogged {
    pub expense: Expense,
    pub mission: Option<MissionOutcome>,
}

/// Result of logging a saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavingLogged {
    pub saving: Saving,
    pub mission: Option<MissionOutcome>,
}

/// Port for mission reads and the transactional activity loggers.
///
/// The loggers insert the activity row, advance the day's mission progress,
/// and credit the completion reward all in one transaction. When no mission
/// is active for `day` the activity row is still inserted and the mission
/// outcome is `None`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MissionStore: Send + Sync {
    async fn todays_mission(
        &self,
        user_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<TodaysMission>, MissionStoreError>;

    async fn log_expense(
        &self,
        user_id: Uuid,
        draft: ExpenseDraft,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ExpenseLogged, MissionStoreError>;

    async fn log_saving(
        &self,
        user_id: Uuid,
        draft: SavingDraft,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<SavingLogged, MissionStoreError>;

    async fn list_expenses(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Expense>, MissionStoreError>;

    async fn list_savings(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Saving>, MissionStoreError>;
}
