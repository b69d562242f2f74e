//! Mission engine service: today's mission, activity logging, histories.
//!
//! "Today" is always the UTC date of the call; the store performs the
//! transactional progress update and reward credit.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::activity::{Expense, ExpenseDraft, Saving, SavingDraft};
use super::error::Error;
use super::ports::{
    ExpenseLogged, MissionStore, MissionStoreError, SavingLogged, TodaysMission,
};
use super::wallet_service::clamp_limit;

#[derive(Clone)]
pub struct MissionService {
    store: Arc<dyn MissionStore>,
}

impl MissionService {
    pub fn new(store: Arc<dyn MissionStore>) -> Self {
        Self { store }
    }

    /// Today's mission with the caller's progress record.
    pub async fn todays_mission(&self, user_id: Uuid) -> Result<TodaysMission, Error> {
        self.store
            .todays_mission(user_id, Utc::now().date_naive())
            .await
            .map_err(map_mission_store_error)?
            .ok_or_else(|| Error::no_active_mission("no mission is active today"))
    }

    /// Log an expense and advance any active mission.
    ///
    /// Logging never fails for want of a mission: without one the activity
    /// row is still recorded and the mission outcome is absent.
    pub async fn log_expense(
        &self,
        user_id: Uuid,
        amount: Decimal,
        category: &str,
        description: Option<&str>,
    ) -> Result<ExpenseLogged, Error> {
        let draft = ExpenseDraft::new(amount, category, description)?;
        let now = Utc::now();
        self.store
            .log_expense(user_id, draft, now.date_naive(), now)
            .await
            .map_err(map_mission_store_error)
    }

    /// Log a saving and advance any active mission.
    pub async fn log_saving(
        &self,
        user_id: Uuid,
        amount: Decimal,
        source: Option<&str>,
    ) -> Result<SavingLogged, Error> {
        let draft = SavingDraft::new(amount, source)?;
        let now = Utc::now();
        self.store
            .log_saving(user_id, draft, now.date_naive(), now)
            .await
            .map_err(map_mission_store_error)
    }

    pub async fn list_expenses(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Expense>, Error> {
        self.store
            .list_expenses(user_id, clamp_limit(limit))
            .await
            .map_err(map_mission_store_error)
    }

    pub async fn list_savings(
        &self,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Saving>, Error> {
        self.store
            .list_savings(user_id, clamp_limit(limit))
            .await
            .map_err(map_mission_store_error)
    }
}

fn map_mission_store_error(error: MissionStoreError) -> Error {
    match error {
        MissionStoreError::Conflict { message } => Error::conflict(message),
        MissionStoreError::Connection { message } => {
            Error::service_unavailable(format!("mission store unavailable: {message}"))
        }
        MissionStoreError::Query { message } => {
            Error::internal(format!("mission store error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::fixtures::{FixtureMissionStore, FIXTURE_USER_ID};
    use crate::domain::ports::mission_store::MockMissionStore;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn service() -> MissionService {
        MissionService::new(Arc::new(FixtureMissionStore))
    }

    #[rstest]
    #[tokio::test]
    async fn todays_mission_surfaces_the_active_mission() {
        let today = service()
            .todays_mission(FIXTURE_USER_ID)
            .await
            .expect("active");
        assert_eq!(today.mission.active_date, Utc::now().date_naive());
    }

    #[rstest]
    #[tokio::test]
    async fn absent_mission_maps_to_no_active_mission() {
        let mut store = MockMissionStore::new();
        store.expect_todays_mission().returning(|_, _| Ok(None));
        let service = MissionService::new(Arc::new(store));

        let err = service
            .todays_mission(FIXTURE_USER_ID)
            .await
            .expect_err("none");
        assert_eq!(err.code(), ErrorCode::NoActiveMission);
    }

    #[rstest]
    #[tokio::test]
    async fn log_expense_validates_amount_before_the_store() {
        let err = service()
            .log_expense(FIXTURE_USER_ID, dec!(-1), "snack", None)
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
    }

    #[rstest]
    #[tokio::test]
    async fn log_expense_reports_mission_progress() {
        let logged = service()
            .log_expense(FIXTURE_USER_ID, dec!(1), "snack", None)
            .await
            .expect("logs");
        let mission = logged.mission.expect("mission active");
        assert_eq!(mission.progress_pct, 33);
        assert!(!mission.completed);
    }

    #[rstest]
    #[tokio::test]
    async fn log_saving_without_mission_still_logs() {
        let logged = service()
            .log_saving(FIXTURE_USER_ID, dec!(5), Some("allowance"))
            .await
            .expect("logs");
        assert!(logged.mission.is_none());
        assert_eq!(logged.saving.amount, dec!(5));
    }
}
