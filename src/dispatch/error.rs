//! Error taxonomy and the default error-to-response mapper.
//!
//! # Responsibilities
//! - Classify everything a guard, coercion, or handler can raise
//! - Map each class to an HTTP status and a structured JSON body
//! - Serve as the fallback when a route configures no error handler
//!
//! # Design Decisions
//! - One enum for all origins; the pipeline does not care which phase raised it
//! - Application errors carry their own status; everything else is a 500
//! - An arbitrary JSON payload raised as an error becomes the response body as-is

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Structured `{status, message}` body used for mapped errors and
/// no-content responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: u16,
    pub message: String,
}

pub(crate) const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Anything a guard, coercion function, or handler can fail with.
#[derive(Debug, Error)]
pub enum RouteError {
    /// An application error carrying an explicit HTTP status code.
    #[error("{message}")]
    App { status: StatusCode, message: String },

    /// A generic error with no status of its own.
    #[error("{0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),

    /// An arbitrary structured value raised as an error.
    #[error("structured error payload")]
    Payload(Value),

    /// Nothing usable was raised.
    #[error("An unknown error occurred.")]
    Unknown,
}

impl RouteError {
    /// An error with an explicit HTTP status, e.g.
    /// `RouteError::app(StatusCode::UNAUTHORIZED, "Unauthorized")`.
    pub fn app(status: StatusCode, message: impl Into<String>) -> Self {
        RouteError::App {
            status,
            message: message.into(),
        }
    }

    /// Wrap any error type that has no HTTP status of its own.
    pub fn internal(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RouteError::Internal(source.into())
    }

    /// Raise an arbitrary JSON value; the default mapper sends it back verbatim.
    pub fn payload(value: Value) -> Self {
        RouteError::Payload(value)
    }

    /// The status the default mapper would respond with.
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::App { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(source: serde_json::Error) -> Self {
        RouteError::Internal(Box::new(source))
    }
}

/// Default error mapper: the route's fallback when no `error` function is
/// configured on its builder.
pub fn error_response(error: &RouteError) -> Response {
    tracing::error!(%error, "request error");

    match error {
        RouteError::App { status, message } => (
            *status,
            Json(StatusMessage {
                status: status.as_u16(),
                message: message.clone(),
            }),
        )
            .into_response(),
        RouteError::Internal(source) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusMessage {
                status: 500,
                message: source.to_string(),
            }),
        )
            .into_response(),
        RouteError::Payload(value) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(value.clone())).into_response()
        }
        RouteError::Unknown => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StatusMessage {
                status: 500,
                message: UNKNOWN_ERROR_MESSAGE.to_owned(),
            }),
        )
            .into_response(),
    }
}
