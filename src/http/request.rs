//! Request identification.
//!
//! # Responsibilities
//! - Stamp every incoming request with an `x-request-id` header
//!
//! # Design Decisions
//! - Added as the outermost layer so the ID is present for tracing and can
//!   be read by guards and handlers through the request head
//! - A caller-supplied ID is kept; one is only generated when absent

use std::task::{Context, Poll};

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps a UUID v4 request ID on requests missing one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(X_REQUEST_ID) {
            if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Response;
    use std::convert::Infallible;
    use tower::ServiceExt;

    #[tokio::test]
    async fn missing_request_id_is_generated() {
        let service = RequestIdLayer.layer(tower::service_fn(|req: Request<Body>| async move {
            let id = req
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_owned();
            Ok::<_, Infallible>(Response::new(Body::from(id)))
        }));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert!(Uuid::parse_str(std::str::from_utf8(&bytes).unwrap()).is_ok());
    }

    #[tokio::test]
    async fn existing_request_id_is_kept() {
        let service = RequestIdLayer.layer(tower::service_fn(|req: Request<Body>| async move {
            let id = req
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_owned();
            Ok::<_, Infallible>(Response::new(Body::from(id)))
        }));

        let mut request = Request::new(Body::empty());
        request
            .headers_mut()
            .insert(X_REQUEST_ID, HeaderValue::from_static("caller-id"));

        let response = service.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(&bytes[..], b"caller-id");
    }
}
