//! Bearer-credential auth gate.
//!
//! The extractor resolves the `Authorization: Bearer <credential>` header
//! to a user id through the `TokenService` port, so handlers receive an
//! authenticated principal and never see the credential format.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::domain::Error;
use crate::inbound::http::state::HttpState;

/// Authenticated principal for the current request.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    user_id: Uuid,
}

impl AuthContext {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

fn resolve(req: &HttpRequest) -> Result<AuthContext, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer credential"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let credential = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;

    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("auth state is not configured"))?;

    let user_id = state
        .tokens
        .resolve(credential)
        .map_err(|_| Error::unauthorized("credential is invalid or expired"))?;
    Ok(AuthContext { user_id })
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
