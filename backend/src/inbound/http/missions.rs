//! Mission endpoints.
//!
//! ```text
//! GET  /api/missions/today
//! POST /api/missions/log-expense
//! POST /api/missions/log-saving
//! GET  /api/missions/expenses
//! GET  /api/missions/savings
//! ```

use actix_web::{get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::MissionOutcome;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::{
    money, ExpenseBody, MissionBody, MissionProgressBody, SavingBody,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::LimitQuery;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaysMissionBody {
    pub mission: MissionBody,
    pub progress: MissionProgressBody,
    pub progress_pct: u8,
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogExpenseRequest {
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSavingRequest {
    pub amount: Decimal,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLoggedBody {
    pub logged: bool,
    pub expense: ExpenseBody,
    pub mission_progress: u8,
    pub mission_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_coins: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingLoggedBody {
    pub logged: bool,
    pub saving: SavingBody,
    pub mission_progress: u8,
    pub mission_completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_coins: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListBody {
    pub expenses: Vec<ExpenseBody>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingListBody {
    pub savings: Vec<SavingBody>,
}

/// `(progress %, completed, reward)` from an optional mission outcome;
/// loggers report zero progress when no mission is active today.
fn mission_fields(outcome: &Option<MissionOutcome>) -> (u8, bool, Option<f64>) {
    match outcome {
        Some(outcome) => (
            outcome.progress_pct,
            outcome.completed,
            outcome.reward_credited.map(money),
        ),
        None => (0, false, None),
    }
}

/// Today's mission with the caller's progress.
#[get("/missions/today")]
pub async fn todays_mission(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<TodaysMissionBody>> {
    let today = state.missions.todays_mission(auth.user_id()).await?;
    Ok(web::Json(TodaysMissionBody {
        mission: MissionBody::from(today.mission),
        progress: MissionProgressBody::from(today.record.progress),
        progress_pct: today.progress_pct,
        completed: today.record.completed,
    }))
}

/// Log an expense and advance any active mission.
#[post("/missions/log-expense")]
pub async fn log_expense(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<LogExpenseRequest>,
) -> ApiResult<web::Json<ExpenseLoggedBody>> {
    let logged = state
        .missions
        .log_expense(
            auth.user_id(),
            payload.amount,
            &payload.category,
            payload.description.as_deref(),
        )
        .await?;

    let (mission_progress, mission_completed, reward_coins) = mission_fields(&logged.mission);
    Ok(web::Json(ExpenseLoggedBody {
        logged: true,
        expense: ExpenseBody::from(logged.expense),
        mission_progress,
        mission_completed,
        reward_coins,
    }))
}

/// Log a saving and advance any active mission.
#[post("/missions/log-saving")]
pub async fn log_saving(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<LogSavingRequest>,
) -> ApiResult<web::Json<SavingLoggedBody>> {
    let logged = state
        .missions
        .log_saving(auth.user_id(), payload.amount, payload.source.as_deref())
        .await?;

    let (mission_progress, mission_completed, reward_coins) = mission_fields(&logged.mission);
    Ok(web::Json(SavingLoggedBody {
        logged: true,
        saving: SavingBody::from(logged.saving),
        mission_progress,
        mission_completed,
        reward_coins,
    }))
}

#[get("/missions/expenses")]
pub async fn list_expenses(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<ExpenseListBody>> {
    let expenses = state
        .missions
        .list_expenses(auth.user_id(), query.limit)
        .await?;
    Ok(web::Json(ExpenseListBody {
        expenses: expenses.into_iter().map(ExpenseBody::from).collect(),
    }))
}

#[get("/missions/savings")]
pub async fn list_savings(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<SavingListBody>> {
    let savings = state
        .missions
        .list_savings(auth.user_id(), query.limit)
        .await?;
    Ok(web::Json(SavingListBody {
        savings: savings.into_iter().map(SavingBody::from).collect(),
    }))
}
