//! Port for savings goals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::goal::{Goal, GoalDraft, GoalProgressOutcome};

use super::macros::port_error;

port_error! {
    /// Errors raised by goal store adapters.
    pub enum GoalStoreError {
        /// No goal with that id belongs to the user.
        GoalNotFound => "goal not found",
        /// The goal was already completed.
        AlreadyCompleted => "goal is already completed",
        /// A concurrent update won the race after the retry.
        Conflict { message } => "goal update conflicted: {message}",
        /// Repository connection could not be established.
        Connection { message } => "goal store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message } => "goal store query failed: {message}",
    }
}

/// Listing filter for the goal collection endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalFilter {
    All,
    Active,
    Completed,
}

/// Port for goal rows and the progress transaction.
///
/// `add_progress` locks the goal row, applies the contribution, and credits
/// the completion bonus in the same transaction when the target is met.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        draft: GoalDraft,
        now: DateTime<Utc>,
    ) -> Result<Goal, GoalStoreError>;

    /// Newest-first goals matching the filter.
    async fn list(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>, GoalStoreError>;

    async fn add_progress(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<GoalProgressOutcome, GoalStoreError>;

    async fn delete(&self, goal_id: Uuid, user_id: Uuid) -> Result<(), GoalStoreError>;

    /// Most recently created incomplete goals, newest first, at most `limit`.
    async fn recent_incomplete(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Goal>, GoalStoreError>;
}
