//! Health endpoint.

use actix_web::{get, web};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Liveness probe; requires no authentication.
#[get("/health")]
pub async fn health() -> web::Json<HealthBody> {
    web::Json(HealthBody { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn health_reports_ok_without_auth() {
        let app = test::init_service(App::new().service(health)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["status"], "ok");
    }
}
