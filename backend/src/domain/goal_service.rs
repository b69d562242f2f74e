//! Goal engine service: CRUD plus the progress/bonus transaction.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::Error;
use super::goal::{Goal, GoalDraft, GoalProgressOutcome};
use super::money;
use super::ports::{GoalFilter, GoalStore, GoalStoreError};

#[derive(Clone)]
pub struct GoalService {
    store: Arc<dyn GoalStore>,
}

impl GoalService {
    pub fn new(store: Arc<dyn GoalStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        target_amount: Decimal,
        description: Option<&str>,
    ) -> Result<Goal, Error> {
        let draft = GoalDraft::new(title, target_amount, description)?;
        self.store
            .create(user_id, draft, Utc::now())
            .await
            .map_err(map_goal_store_error)
    }

    pub async fn list(&self, user_id: Uuid, filter: GoalFilter) -> Result<Vec<Goal>, Error> {
        self.store
            .list(user_id, filter)
            .await
            .map_err(map_goal_store_error)
    }

    /// Contribute to a goal; completing it credits the bonus in the same
    /// store transaction.
    pub async fn add_progress(
        &self,
        goal_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
    ) -> Result<GoalProgressOutcome, Error> {
        let amount = money::require_positive("amount", amount)?;
        self.store
            .add_progress(goal_id, user_id, amount, Utc::now())
            .await
            .map_err(map_goal_store_error)
    }

    pub async fn delete(&self, goal_id: Uuid, user_id: Uuid) -> Result<(), Error> {
        self.store
            .delete(goal_id, user_id)
            .await
            .map_err(map_goal_store_error)
    }
}

fn map_goal_store_error(error: GoalStoreError) -> Error {
    match error {
        GoalStoreError::GoalNotFound => Error::not_found("goal not found"),
        GoalStoreError::AlreadyCompleted => Error::already_completed("goal is already completed"),
        GoalStoreError::Conflict { message } => Error::conflict(message),
        GoalStoreError::Connection { message } => {
            Error::service_unavailable(format!("goal store unavailable: {message}"))
        }
        GoalStoreError::Query { message } => Error::internal(format!("goal store error: {message}")),
    }
}
