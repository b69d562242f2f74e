//! Account endpoints.
//!
//! ```text
//! POST /api/auth/register
//! POST /api/auth/login
//! ```
//!
//! The only endpoints besides `/health` that accept unauthenticated
//! callers.

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::auth_service::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseBody {
    pub user_id: String,
    pub token: String,
}

impl From<AuthenticatedUser> for AuthResponseBody {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            user_id: auth.user_id.to_string(),
            token: auth.token,
        }
    }
}

/// Create an account and return its first credential.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let auth = state
        .auth
        .register(&payload.username, &payload.email, &payload.password)
        .await?;
    Ok(HttpResponse::Created().json(AuthResponseBody::from(auth)))
}

/// Exchange a username and password for a credential.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let auth = state
        .auth
        .login(&payload.username, &payload.password)
        .await?;
    Ok(HttpResponse::Ok().json(AuthResponseBody::from(auth)))
}

#[cfg(test)]
mod tests {
    use super::*;
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
            .service(web::scope("/api").service(register).service(login))
    }

    #[actix_web::test]
    async fn register_returns_created_with_user_and_token() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({
                    "username": "newkid",
                    "email": "n@example.com",
                    "password": "Secret123"
                }))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert!(body.get("userId").is_some());
        assert!(body["token"].as_str().expect("token").starts_with("fixture-token-"));
    }

    #[actix_web::test]
    async fn register_reports_field_level_validation_errors() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(json!({"username": "x", "email": "bad", "password": "pw"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(
            body["validationErrors"].as_array().expect("details").len(),
            3
        );
    }

    #[actix_web::test]
    async fn login_rejects_wrong_passwords_uniformly() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "kid", "password": "WrongPass1"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "invalid username or password");
    }

    #[actix_web::test]
    async fn login_succeeds_for_known_credentials() {
        let app = test::init_service(app()).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"username": "kid", "password": "Secret123"}))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
