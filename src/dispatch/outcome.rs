//! Handler and guard result shapes, and the result-count response rule.
//!
//! # Responsibilities
//! - Model the three result shapes a handler can produce: an immediate value,
//!   a deferred (future) value, or a push-sequence (stream) of values
//! - Model the same three shapes for guard results
//! - Map a collected result list onto 204 / 200-single / 200-array
//!
//! # Design Decisions
//! - A closed enum, chosen once by the handler, instead of runtime inspection
//! - Values serialize to JSON at construction so the pipeline only moves
//!   `serde_json::Value`s
//! - A value serializing to `null` counts as "no content" for the immediate
//!   and deferred shapes; inside a stream, `null` is an emitted value

use std::future::Future;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::error::{RouteError, StatusMessage};

pub(crate) const NO_CONTENT_MESSAGE: &str = "Route handler returned no content.";

/// What a route handler hands back to the pipeline.
pub enum Outcome {
    /// A value that is already available. `None` means no content.
    Ready(Option<Value>),
    /// A single eventual value or error.
    Deferred(BoxFuture<'static, Result<Option<Value>, RouteError>>),
    /// Zero or more values over time, then completion or an error.
    Stream(BoxStream<'static, Result<Value, RouteError>>),
}

impl Outcome {
    /// An immediate value. Serializing to `null` (e.g. `Option::None`)
    /// produces a no-content response.
    pub fn value<T: Serialize>(value: T) -> Result<Outcome, RouteError> {
        let value = serde_json::to_value(value)?;
        Ok(Outcome::Ready(nullable(value)))
    }

    /// An immediate no-content result.
    pub fn none() -> Result<Outcome, RouteError> {
        Ok(Outcome::Ready(None))
    }

    /// A deferred value; awaited by the pipeline. Resolving to `null` is
    /// no content, an `Err` goes to the error phase.
    pub fn deferred<F, T>(future: F) -> Result<Outcome, RouteError>
    where
        F: Future<Output = Result<T, RouteError>> + Send + 'static,
        T: Serialize,
    {
        Ok(Outcome::Deferred(Box::pin(async move {
            let value = serde_json::to_value(future.await?)?;
            Ok(nullable(value))
        })))
    }

    /// A push-sequence. Every emitted value is buffered in order; an emitted
    /// error cancels the subscription and goes to the error phase.
    pub fn stream<S, T>(stream: S) -> Result<Outcome, RouteError>
    where
        S: Stream<Item = Result<T, RouteError>> + Send + 'static,
        T: Serialize,
    {
        Ok(Outcome::Stream(Box::pin(stream.map(|item| {
            item.and_then(|value| serde_json::to_value(value).map_err(RouteError::from))
        }))))
    }
}

fn nullable(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

/// What a guard hands back: the same three shapes, resolved to one value.
pub enum GuardOutcome<G> {
    Ready(Result<G, RouteError>),
    Deferred(BoxFuture<'static, Result<G, RouteError>>),
    Stream(BoxStream<'static, Result<G, RouteError>>),
}

impl<G> GuardOutcome<G> {
    /// Let the request through, forwarding `value` to the handler.
    pub fn allow(value: G) -> Self {
        GuardOutcome::Ready(Ok(value))
    }

    /// Reject the request with `error`.
    pub fn deny(error: RouteError) -> Self {
        GuardOutcome::Ready(Err(error))
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<G, RouteError>> + Send + 'static,
    {
        GuardOutcome::Deferred(Box::pin(future))
    }

    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<G, RouteError>> + Send + 'static,
    {
        GuardOutcome::Stream(Box::pin(stream))
    }

    /// Resolve to a single value. A stream yields its first item and the rest
    /// of the sequence is dropped; completing without one is an error.
    pub(crate) async fn resolve(self) -> Result<G, RouteError> {
        match self {
            GuardOutcome::Ready(result) => result,
            GuardOutcome::Deferred(future) => future.await,
            GuardOutcome::Stream(mut stream) => match stream.next().await {
                Some(item) => item,
                None => Err(RouteError::internal(
                    "guard sequence completed without a value",
                )),
            },
        }
    }
}

/// Drive an [`Outcome`] to a single response, or an error for the error phase.
pub(crate) async fn normalize(outcome: Outcome) -> Result<Response, RouteError> {
    match outcome {
        Outcome::Ready(value) => Ok(single_response(value)),
        Outcome::Deferred(future) => Ok(single_response(future.await?)),
        Outcome::Stream(mut stream) => {
            let mut values = Vec::new();
            while let Some(item) = stream.next().await {
                match item {
                    Ok(value) => values.push(value),
                    Err(error) => {
                        // cancel the subscription; later emissions are ignored
                        drop(stream);
                        return Err(error);
                    }
                }
            }
            Ok(collected_response(values))
        }
    }
}

pub(crate) fn single_response(value: Option<Value>) -> Response {
    match value {
        Some(value) => Json(value).into_response(),
        None => no_content_response(),
    }
}

/// The result-count rule: zero values is 204, one value is its own body,
/// two or more become an ordered array.
pub(crate) fn collected_response(mut values: Vec<Value>) -> Response {
    match values.len() {
        0 => no_content_response(),
        1 => Json(values.remove(0)).into_response(),
        _ => Json(Value::Array(values)).into_response(),
    }
}

pub(crate) fn no_content_response() -> Response {
    (
        StatusCode::NO_CONTENT,
        Json(StatusMessage {
            status: 204,
            message: NO_CONTENT_MESSAGE.to_owned(),
        }),
    )
        .into_response()
}
