//! Per-request raw input extraction and the context handed to handlers.
//!
//! # Responsibilities
//! - Pull path params, query params, and the parsed JSON body off a request
//! - Collapse repeated query keys into an ordered value list
//! - Assemble the per-request [`DispatchContext`] after guard and coercion
//!
//! # Design Decisions
//! - The body is parsed once, up front, only for JSON content types
//! - Extraction failures (oversized or malformed bodies) respond before the
//!   pipeline starts; they never reach a route's error handler
//! - The context is built fresh per request and never shared

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use axum::body::to_bytes;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::dispatch::error::StatusMessage;

/// Raw path captures, name to string value.
pub type PathParams = HashMap<String, String>;

/// Raw query parameters, name to single value or repeated-value list.
pub type QueryParams = HashMap<String, QueryValue>;

/// A query key's raw value. Repeating a key collects every occurrence, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// The first value for this key.
    pub fn as_str(&self) -> &str {
        match self {
            QueryValue::Single(value) => value,
            QueryValue::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }
}

const BODY_LIMIT: usize = 1024 * 1024;

/// Everything extracted from one incoming request before the pipeline runs.
pub struct RawRequest {
    /// Request head: method, uri, headers, extensions.
    pub parts: Parts,
    pub path_params: PathParams,
    pub query_params: QueryParams,
    /// Parsed JSON body; `Null` when the request carried none.
    pub body: Value,
}

impl RawRequest {
    pub(crate) async fn from_request(request: Request) -> Result<Self, Response> {
        let (mut parts, body) = request.into_parts();

        let path_params =
            match axum::extract::RawPathParams::from_request_parts(&mut parts, &()).await {
                Ok(params) => params
                    .iter()
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
                    .collect(),
                Err(_) => PathParams::new(),
            };

        let query_params = parse_query(parts.uri.query());

        let bytes = match to_bytes(body, BODY_LIMIT).await {
            Ok(bytes) => bytes,
            Err(_) => {
                return Err((
                    StatusCode::PAYLOAD_TOO_LARGE,
                    Json(StatusMessage {
                        status: 413,
                        message: "Request body exceeded the size limit.".to_owned(),
                    }),
                )
                    .into_response())
            }
        };

        let body = if bytes.is_empty() || !is_json(&parts) {
            Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(error) => {
                    return Err((
                        StatusCode::BAD_REQUEST,
                        Json(StatusMessage {
                            status: 400,
                            message: format!("Invalid JSON body: {error}"),
                        }),
                    )
                        .into_response())
                }
            }
        };

        Ok(Self {
            parts,
            path_params,
            query_params,
            body,
        })
    }
}

fn is_json(parts: &Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|content_type| {
            let mime = content_type.split(';').next().unwrap_or("").trim();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

pub(crate) fn parse_query(query: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();
    let Some(query) = query else {
        return params;
    };

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match params.entry(key.into_owned()) {
            Entry::Vacant(entry) => {
                entry.insert(QueryValue::Single(value));
            }
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                match slot {
                    QueryValue::Single(first) => {
                        let first = std::mem::take(first);
                        *slot = QueryValue::Many(vec![first, value]);
                    }
                    QueryValue::Many(values) => values.push(value),
                }
            }
        }
    }

    params
}

/// The per-request bundle passed to the route handler.
///
/// Concerns with no coercion function configured stay `None`, whatever the
/// raw request contained. `guard_result` is `None` only on guardless routes.
pub struct DispatchContext<Q, U, B, G> {
    pub guard_result: Option<G>,
    pub query_params: Option<Q>,
    pub url_params: Option<U>,
    pub body: Option<B>,
    /// Raw request head, for handlers that need headers or the original uri.
    pub parts: Parts,
}
