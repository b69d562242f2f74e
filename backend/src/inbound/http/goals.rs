//! Goal endpoints.
//!
//! ```text
//! POST   /api/goals
//! GET    /api/goals
//! GET    /api/goals/active
//! GET    /api/goals/completed
//! POST   /api/goals/{goal_id}/progress
//! DELETE /api/goals/{goal_id}
//! ```

use actix_web::{delete, get, post, web, HttpResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ports::GoalFilter;
use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::{money, GoalBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    pub target_amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoalProgressRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalListBody {
    pub goals: Vec<GoalBody>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressBody {
    pub current_amount: f64,
    pub progress_pct: u8,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_awarded: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalDeletedBody {
    pub success: bool,
}

/// Create a goal.
#[post("/goals")]
pub async fn create_goal(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<CreateGoalRequest>,
) -> ApiResult<HttpResponse> {
    let goal = state
        .goals
        .create(
            auth.user_id(),
            &payload.title,
            payload.target_amount,
            payload.description.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Created().json(GoalBody::from(goal)))
}

#[get("/goals")]
pub async fn list_goals(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<GoalListBody>> {
    list_with_filter(&state, auth, GoalFilter::All).await
}

#[get("/goals/active")]
pub async fn list_active_goals(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<GoalListBody>> {
    list_with_filter(&state, auth, GoalFilter::Active).await
}

#[get("/goals/completed")]
pub async fn list_completed_goals(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<GoalListBody>> {
    list_with_filter(&state, auth, GoalFilter::Completed).await
}

async fn list_with_filter(
    state: &web::Data<HttpState>,
    auth: AuthContext,
    filter: GoalFilter,
) -> ApiResult<web::Json<GoalListBody>> {
    let goals = state.goals.list(auth.user_id(), filter).await?;
    Ok(web::Json(GoalListBody {
        goals: goals.into_iter().map(GoalBody::from).collect(),
    }))
}

/// Contribute to a goal; completion awards the bonus.
#[post("/goals/{goal_id}/progress")]
pub async fn add_progress(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    payload: web::Json<GoalProgressRequest>,
) -> ApiResult<web::Json<GoalProgressBody>> {
    let outcome = state
        .goals
        .add_progress(path.into_inner(), auth.user_id(), payload.amount)
        .await?;
    Ok(web::Json(GoalProgressBody {
        current_amount: money(outcome.current_amount),
        progress_pct: outcome.progress_pct,
        completed: outcome.completed,
        bonus_awarded: outcome.bonus_awarded.map(money),
    }))
}

/// Delete a goal.
#[delete("/goals/{goal_id}")]
pub async fn delete_goal(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<GoalDeletedBody>> {
    state
        .goals
        .delete(path.into_inner(), auth.user_id())
        .await?;
    Ok(web::Json(GoalDeletedBody { success: true }))
}
