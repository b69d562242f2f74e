//! AI adventure endpoints.
//!
//! ```text
//! POST /api/adventure/generate
//! POST /api/adventure/submit-choice
//! GET  /api/adventure
//! GET  /api/adventure/{adventure_id}
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inbound::http::auth::AuthContext;
use crate::inbound::http::schemas::AdventureBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_uuid, LimitQuery};
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitChoiceRequest {
    pub adventure_id: String,
    pub choice_index: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdventureListBody {
    pub adventures: Vec<AdventureBody>,
}

/// Generate a new adventure; each call creates a new unsubmitted record.
#[post("/adventure/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: Option<web::Json<GenerateRequest>>,
) -> ApiResult<HttpResponse> {
    let context = payload.and_then(|body| body.into_inner().context);
    let adventure = state
        .adventures
        .generate(auth.user_id(), context.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(AdventureBody::from(adventure)))
}

/// Submit the player's choice; the evaluation is written once.
#[post("/adventure/submit-choice")]
pub async fn submit_choice(
    state: web::Data<HttpState>,
    auth: AuthContext,
    payload: web::Json<SubmitChoiceRequest>,
) -> ApiResult<web::Json<AdventureBody>> {
    let adventure_id = parse_uuid(&payload.adventure_id, "adventureId")?;
    let adventure = state
        .adventures
        .submit_choice(auth.user_id(), adventure_id, payload.choice_index)
        .await?;
    Ok(web::Json(AdventureBody::from(adventure)))
}

/// Newest-first adventure history.
#[get("/adventure")]
pub async fn history(
    state: web::Data<HttpState>,
    auth: AuthContext,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<AdventureListBody>> {
    let adventures = state
        .adventures
        .history(auth.user_id(), query.limit)
        .await?;
    Ok(web::Json(AdventureListBody {
        adventures: adventures.into_iter().map(AdventureBody::from).collect(),
    }))
}

/// A single adventure, scoped to the caller.
#[get("/adventure/{adventure_id}")]
pub async fn get_adventure(
    state: web::Data<HttpState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<AdventureBody>> {
    let adventure = state
        .adventures
        .get(auth.user_id(), path.into_inner())
        .await?;
    Ok(web::Json(AdventureBody::from(adventure)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::fixtures::{
        FixtureTokenService, FIXTURE_ADVENTURE_ID, FIXTURE_USER_ID,
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
            .service(
                web::scope("/api")
                    .service(generate)
                    .service(submit_choice)
                    .service(history)
                    .service(get_adventure),
            )
    }

    fn bearer() -> (actix_web::http::header::HeaderName, String) {
        let token = FixtureTokenService
            .issue(FIXTURE_USER_ID)
            .expect("fixture issues");
        (AUTHORIZATION, format!("Bearer {token}"))
    }

    #[actix_web::test]
    async fn generate_returns_created_with_the_generation_trace_id() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/adventure/generate")
                .insert_header(bearer())
                .set_json(json!({}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["generationTraceId"], "t1");
        assert_eq!(body["choices"].as_array().expect("choices").len(), 2);
        assert!(body["selectedChoiceIndex"].is_null());
    }

    #[actix_web::test]
    async fn submit_choice_echoes_feedback_scores_and_trace_id() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/adventure/submit-choice")
                .insert_header(bearer())
                .set_json(json!({"adventureId": FIXTURE_ADVENTURE_ID, "choiceIndex": 0}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["selectedChoiceIndex"], 0);
        assert_eq!(body["feedback"], "Pilihan bagus");
        assert_eq!(body["evaluationTraceId"], "t2");
        assert_eq!(body["scores"]["age_appropriateness"], 0.9);
    }

    #[actix_web::test]
    async fn out_of_range_choices_are_rejected() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/adventure/submit-choice")
                .insert_header(bearer())
                .set_json(json!({"adventureId": FIXTURE_ADVENTURE_ID, "choiceIndex": 5}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "invalid_choice");
    }

    #[actix_web::test]
    async fn unknown_adventures_are_not_found() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/adventure/{}", Uuid::new_v4()))
                .insert_header(bearer())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
