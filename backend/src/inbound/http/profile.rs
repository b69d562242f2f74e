//! Profile endpoints.
//!
//! ```text
//! POST /api/profile
//! GET  /api/profile
//! ```

use actix_web::{get, post, web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::ProfileBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProfileRequest {
    pub age: i32,
    pub allowance: Decimal,
    pub currency: Option<String>,
}

/// Create the caller's profile.
#[post("/profile")]
pub async fn create_profile(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<CreateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let profile = state
        .profiles
        .create_profile(
            auth.user_id(),
            payload.age,
            payload.allowance,
            payload.currency.as_deref(),
        )
        .await?;
    Ok(HttpResponse::Created().json(ProfileBody::from(profile)))
}

/// Read the caller's profile.
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<ProfileBody>> {
    let profile = state.profiles.get_profile(auth.user_id()).await?;
    Ok(web::Json(ProfileBody::from(profile)))
}
