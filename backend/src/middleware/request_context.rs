//! Request-context middleware.
//!
//! Each inbound request receives a UUID trace id; the trace id and the
//! request path are stored task-locally so the error envelope can carry
//! `path` and responses can carry a `Trace-Id` header without threading
//! request state through every handler.

use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tokio::task_local;
use tracing::info_span;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct RequestContext {
    trace_id: String,
    path: String,
}

task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Trace identifier for the current request, if inside one.
pub fn current_trace_id() -> Option<String> {
    REQUEST_CONTEXT.try_with(|ctx| ctx.trace_id.clone()).ok()
}

/// Request path for the current request, if inside one.
pub fn current_path() -> Option<String> {
    REQUEST_CONTEXT.try_with(|ctx| ctx.path.clone()).ok()
}

/// Middleware attaching the request-scoped context and a `Trace-Id`
/// response header.
#[derive(Clone)]
pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestTrace`].
pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let context = RequestContext {
            trace_id: Uuid::new_v4().to_string(),
            path: req.path().to_owned(),
        };
        let span = info_span!(
            "request",
            trace_id = %context.trace_id,
            method = %req.method(),
            path = %context.path,
        );
        let trace_id = context.trace_id.clone();
        let fut = self.service.call(req);

        Box::pin(REQUEST_CONTEXT.scope(context, async move {
            let _enter = span.enter();
            let mut res = fut.await?;
            res.response_mut().headers_mut().insert(
                HeaderName::from_static("trace-id"),
                HeaderValue::from_str(&trace_id).expect("UUID is a valid header value"),
            );
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn responses_carry_a_trace_id_header() {
        let app = test::init_service(App::new().wrap(RequestTrace).route(
            "/ping",
            web::get().to(|| async { HttpResponse::Ok().finish() }),
        ))
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        let header = res
            .headers()
            .get("trace-id")
            .expect("trace id header present");
        Uuid::parse_str(header.to_str().expect("ascii")).expect("header is a UUID");
    }

    #[actix_web::test]
    async fn handlers_observe_the_request_path() {
        let app = test::init_service(App::new().wrap(RequestTrace).route(
            "/api/wallet",
            web::get().to(|| async {
                let path = current_path().unwrap_or_default();
                HttpResponse::Ok().body(path)
            }),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/wallet").to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body, "/api/wallet");
    }

    #[::core::prelude::v1::test]
    fn context_is_absent_outside_a_request() {
        assert_eq!(current_trace_id(), None);
        assert_eq!(current_path(), None);
    }
}
