//! Tamagotchi endpoints.
//!
//! ```text
//! GET  /api/tamagotchi
//! POST /api/tamagotchi/feed
//! POST /api/tamagotchi/rename
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::TamagotchiBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_uuid;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    pub food_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponseBody {
    pub hunger: i32,
    pub happiness: i32,
    pub health: i32,
    pub mission_progress: u8,
    pub mission_completed: bool,
}

/// Read the pet's state.
#[get("/tamagotchi")]
pub async fn get_tamagotchi(
    state: web::Data<HttpState>,
    auth: AuthContext,
) -> ApiResult<web::Json<TamagotchiBody>> {
    let pet = state.tamagotchi.get(auth.user_id()).await?;
    Ok(web::Json(TamagotchiBody::from(pet)))
}

/// Feed one unit of an owned food.
#[post("/tamagotchi/feed")]
pub async fn feed(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<FeedRequest>,
) -> ApiResult<web::Json<FeedResponseBody>> {
    let food_id = parse_uuid(&payload.food_id, "foodId")?;
    let outcome = state.tamagotchi.feed(auth.user_id(), food_id).await?;

    let (mission_progress, mission_completed) = outcome
        .mission
        .as_ref()
        .map(|mission| (mission.progress_pct, mission.completed))
        .unwrap_or((0, false));

    Ok(web::Json(FeedResponseBody {
        hunger: outcome.vitals.hunger(),
        happiness: outcome.vitals.happiness(),
        health: outcome.vitals.health(),
        mission_progress,
        mission_completed,
    }))
}

/// Rename the pet.
#[post("/tamagotchi/rename")]
pub async fn rename(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<RenameRequest>,
) -> ApiResult<web::Json<TamagotchiBody>> {
    let pet = state.tamagotchi.rename(auth.user_id(), &payload.name).await?;
    Ok(web::Json(TamagotchiBody::from(pet)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::fixtures::{
        FixtureTokenService, FIXTURE_FOOD_ID, FIXTURE_USER_ID,
    };
    use crate::domain::ports::TokenService as _;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    fn app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::fixtures()))
            .service(web::scope("/api").service(get_tamagotchi).service(feed))
    }

    fn bearer() -> (actix_web::http::header::HeaderName, String) {
        let token = FixtureTokenService
            .issue(FIXTURE_USER_ID)
            .expect("fixture issues");
        (AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn feeding_an_apple_reports_the_new_vitals() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/tamagotchi/feed")
                .insert_header(bearer())
                .set_json(json!({"foodId": FIXTURE_FOOD_ID}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["hunger"], 40);
        assert_eq!(body["happiness"], 55);
        assert_eq!(body["health"], 100);
    }

    #[actix_web::test]
    async fn feeding_an_unknown_food_is_not_found() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/tamagotchi/feed")
                .insert_header(bearer())
                .set_json(json!({"foodId": uuid::Uuid::new_v4()}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn state_read_includes_the_stat_triple() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/tamagotchi")
                .insert_header(bearer())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["hunger"], 50);
        assert_eq!(body["happiness"], 50);
        assert_eq!(body["health"], 100);
    }
}
