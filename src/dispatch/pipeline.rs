//! The per-route request pipeline.
//!
//! # Data Flow
//! ```text
//! RawRequest
//!     → guard (resolve ready / deferred / first stream value)
//!     → coercions (url params, query params, body — each optional)
//!     → handler (once, with the assembled DispatchContext)
//!     → normalization (result-count rule over the outcome shape)
//!     → exactly one Response
//! Any phase error → route error handler, or the default mapper
//! ```
//!
//! # Design Decisions
//! - The typed builder and handler are erased here, at registration time, so
//!   the route list stays homogeneous
//! - Phases run strictly in order; nothing starts before the prior phase
//!   resolves
//! - Dropping the in-flight future (connection closed) drops any active
//!   stream, which is the cancellation path

use std::sync::Arc;

use axum::response::Response;
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::dispatch::context::{DispatchContext, PathParams, QueryParams, RawRequest};
use crate::dispatch::error::{error_response, RouteError};
use crate::dispatch::outcome::{normalize, Outcome};
use crate::routing::builder::{CoerceFn, GuardFn, RouteBuilder};

/// A fully-composed route service: one raw request in, one response out.
pub(crate) type DispatchFn =
    Arc<dyn Fn(RawRequest) -> BoxFuture<'static, Response> + Send + Sync>;

/// Freeze a configured builder and handler into the per-request service
/// stored on the route.
pub(crate) fn dispatch_service<Q, U, B, G, H>(
    builder: RouteBuilder<Q, U, B, G>,
    handler: H,
) -> DispatchFn
where
    H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError> + Send + Sync + 'static,
    Q: Send + 'static,
    U: Send + 'static,
    B: Send + 'static,
    G: Send + 'static,
{
    let RouteBuilder {
        guard_fn,
        query_params_fn,
        url_params_fn,
        body_fn,
        error_fn,
        ..
    } = builder;
    let handler = Arc::new(handler);

    Arc::new(move |raw: RawRequest| {
        let guard_fn = guard_fn.clone();
        let url_params_fn = url_params_fn.clone();
        let query_params_fn = query_params_fn.clone();
        let body_fn = body_fn.clone();
        let error_fn = error_fn.clone();
        let handler = handler.clone();

        Box::pin(async move {
            let result = run(
                raw,
                guard_fn,
                url_params_fn,
                query_params_fn,
                body_fn,
                handler,
            )
            .await;

            match result {
                Ok(response) => response,
                // the configured handler fully owns the error response;
                // the default mapper only runs when there is none
                Err(error) => match error_fn {
                    Some(custom) => custom(error),
                    None => error_response(&error),
                },
            }
        })
    })
}

async fn run<Q, U, B, G, H>(
    raw: RawRequest,
    guard_fn: Option<GuardFn<G>>,
    url_params_fn: Option<CoerceFn<PathParams, U>>,
    query_params_fn: Option<CoerceFn<QueryParams, Q>>,
    body_fn: Option<CoerceFn<Value, B>>,
    handler: Arc<H>,
) -> Result<Response, RouteError>
where
    H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError> + Send + Sync + 'static,
{
    let guard_result = match &guard_fn {
        Some(guard) => Some(guard(&raw).resolve().await?),
        None => None,
    };

    let url_params = match &url_params_fn {
        Some(coerce) => Some(coerce(&raw.path_params)?),
        None => None,
    };
    let query_params = match &query_params_fn {
        Some(coerce) => Some(coerce(&raw.query_params)?),
        None => None,
    };
    let body = match &body_fn {
        Some(coerce) => Some(coerce(&raw.body)?),
        None => None,
    };

    let context = DispatchContext {
        guard_result,
        query_params,
        url_params,
        body,
        parts: raw.parts,
    };

    let outcome = handler(context)?;
    normalize(outcome).await
}
