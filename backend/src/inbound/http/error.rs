//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while Actix handlers turn
//! domain failures into the uniform envelope:
//! `{statusCode, message, error, timestamp, path, validationErrors?}`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::error;

use crate::domain::{Error, ErrorCode, FieldError};
use crate::middleware::{current_path, current_trace_id};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict | ErrorCode::AlreadySubmitted | ErrorCode::AlreadyCompleted => {
            StatusCode::CONFLICT
        }
        ErrorCode::InvalidAmount
        | ErrorCode::InvalidChoice
        | ErrorCode::InvalidStarter
        | ErrorCode::InsufficientFunds
        | ErrorCode::InsufficientQuantity
        | ErrorCode::NoActiveMission
        | ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The uniform error envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    status_code: u16,
    message: String,
    error: &'static str,
    timestamp: String,
    path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    validation_errors: Vec<FieldError>,
}

fn envelope_for(err: &Error, status: StatusCode) -> ErrorEnvelope {
    // Never leak internal failure detail to clients.
    let message = if err.code() == ErrorCode::Internal {
        error!(detail = %err.message(), "internal error surfaced to client");
        "Internal server error".to_owned()
    } else {
        err.message().to_owned()
    };

    ErrorEnvelope {
        status_code: status.as_u16(),
        message,
        error: err.code().as_str(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        path: current_path().unwrap_or_default(),
        validation_errors: err.validation_errors().to_vec(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(trace_id) = current_trace_id() {
            builder.insert_header(("Trace-Id", trace_id));
        }
        builder.json(envelope_for(self, status))
    }
}
