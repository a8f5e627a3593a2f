//! Request tracing middleware.
//!
//! Every request runs with a fresh [`TraceId`] in task-local scope, gets a
//! `trace-id` response header and produces one completion event carrying the
//! method, path, status and latency.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Tracing middleware; wrap the whole app with it.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
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
        let trace_id = TraceId::generate();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = match fut.await {
                Ok(res) => res,
                Err(err) => {
                    warn!(
                        %trace_id,
                        %method,
                        path = %path,
                        error = %err,
                        "request failed before a response"
                    );
                    return Err(err);
                }
            };
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(%error, %trace_id, "failed to encode trace identifier header");
                }
            }
            info!(
                %trace_id,
                %method,
                path = %path,
                status = res.status().as_u16(),
                latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "request completed"
            );
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    use crate::domain::Error as DomainError;

    async fn call(
        handler: actix_web::Route,
    ) -> (ServiceResponse<actix_web::body::BoxBody>, String) {
        let app = test::init_service(App::new().wrap(Trace).route("/", handler)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        (res, trace_id)
    }

    #[actix_web::test]
    async fn header_is_a_uuid() {
        let (_, trace_id) =
            call(web::get().to(|| async { HttpResponse::Ok().finish() })).await;
        assert!(trace_id.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn handler_sees_the_header_id() {
        let (res, trace_id) = call(web::get().to(|| async {
            let id = TraceId::current().expect("trace id in scope");
            HttpResponse::Ok().body(id.to_string())
        }))
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body, trace_id.as_bytes());
    }

    #[actix_web::test]
    async fn error_envelope_carries_the_trace_id() {
        let (res, trace_id) = call(web::get().to(|| async {
            Err::<HttpResponse, _>(DomainError::forbidden("not yours"))
        }))
        .await;
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["trace_id"], trace_id.as_str());
        assert_eq!(body["code"], "forbidden");
    }

    #[actix_web::test]
    async fn each_request_gets_its_own_id() {
        let (_, first) = call(web::get().to(|| async { HttpResponse::Ok().finish() })).await;
        let (_, second) = call(web::get().to(|| async { HttpResponse::Ok().finish() })).await;
        assert_ne!(first, second);
    }
}
