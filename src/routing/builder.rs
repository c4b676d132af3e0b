//! Typed per-route configuration builder.
//!
//! # Responsibilities
//! - Accumulate an optional guard, up to three coercion functions, and an
//!   optional error handler for one route
//! - Thread each concern's output type through the builder's generics
//!
//! # Design Decisions
//! - Typestate: every configuration call consumes the builder and returns a
//!   retyped view over the same stored record
//! - Last write wins per concern; functions never chain
//! - The builder is created fresh per registration and frozen once the route
//!   is stored

use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::dispatch::context::{PathParams, QueryParams, RawRequest};
use crate::dispatch::error::RouteError;
use crate::dispatch::outcome::GuardOutcome;

pub(crate) type GuardFn<G> = Arc<dyn Fn(&RawRequest) -> GuardOutcome<G> + Send + Sync>;
pub(crate) type CoerceFn<Raw, Out> =
    Arc<dyn Fn(&Raw) -> Result<Out, RouteError> + Send + Sync>;
pub(crate) type ErrorFn = Arc<dyn Fn(RouteError) -> Response + Send + Sync>;

/// Per-route configuration, generic over the four concern output types:
/// query params, url params, body, and guard result.
///
/// All four concerns are independent and optional; a route configuring none
/// of them behaves identically to one configuring all four, with absent
/// concerns treated as no-ops by the pipeline.
pub struct RouteBuilder<Q = (), U = (), B = (), G = ()> {
    pub(crate) child_path: String,
    pub(crate) guard_fn: Option<GuardFn<G>>,
    pub(crate) query_params_fn: Option<CoerceFn<QueryParams, Q>>,
    pub(crate) url_params_fn: Option<CoerceFn<PathParams, U>>,
    pub(crate) body_fn: Option<CoerceFn<Value, B>>,
    pub(crate) error_fn: Option<ErrorFn>,
}

impl RouteBuilder {
    pub(crate) fn new() -> Self {
        Self {
            child_path: String::new(),
            guard_fn: None,
            query_params_fn: None,
            url_params_fn: None,
            body_fn: None,
            error_fn: None,
        }
    }
}

impl<Q, U, B, G> RouteBuilder<Q, U, B, G> {
    /// Set the child path of this route.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.child_path = path.into();
        self
    }

    /// Apply a guard to this route. The guard runs before any coercion and
    /// its resolved value is forwarded to the handler.
    pub fn guard<G2>(
        self,
        guard: impl Fn(&RawRequest) -> GuardOutcome<G2> + Send + Sync + 'static,
    ) -> RouteBuilder<Q, U, B, G2> {
        RouteBuilder {
            child_path: self.child_path,
            guard_fn: Some(Arc::new(guard)),
            query_params_fn: self.query_params_fn,
            url_params_fn: self.url_params_fn,
            body_fn: self.body_fn,
            error_fn: self.error_fn,
        }
    }

    /// Replace the default error mapper for this route. The function owns the
    /// whole error response.
    pub fn error(
        mut self,
        error_fn: impl Fn(RouteError) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.error_fn = Some(Arc::new(error_fn));
        self
    }

    /// Coerce raw query parameters into a typed value for the handler.
    pub fn coerce_query_params<Q2>(
        self,
        coerce: impl Fn(&QueryParams) -> Result<Q2, RouteError> + Send + Sync + 'static,
    ) -> RouteBuilder<Q2, U, B, G> {
        RouteBuilder {
            child_path: self.child_path,
            guard_fn: self.guard_fn,
            query_params_fn: Some(Arc::new(coerce)),
            url_params_fn: self.url_params_fn,
            body_fn: self.body_fn,
            error_fn: self.error_fn,
        }
    }

    /// Coerce raw url (path) parameters into a typed value for the handler.
    pub fn coerce_url_params<U2>(
        self,
        coerce: impl Fn(&PathParams) -> Result<U2, RouteError> + Send + Sync + 'static,
    ) -> RouteBuilder<Q, U2, B, G> {
        RouteBuilder {
            child_path: self.child_path,
            guard_fn: self.guard_fn,
            query_params_fn: self.query_params_fn,
            url_params_fn: Some(Arc::new(coerce)),
            body_fn: self.body_fn,
            error_fn: self.error_fn,
        }
    }

    /// Coerce the parsed request body into a typed value for the handler.
    pub fn coerce_body<B2>(
        self,
        coerce: impl Fn(&Value) -> Result<B2, RouteError> + Send + Sync + 'static,
    ) -> RouteBuilder<Q, U, B2, G> {
        RouteBuilder {
            child_path: self.child_path,
            guard_fn: self.guard_fn,
            query_params_fn: self.query_params_fn,
            url_params_fn: self.url_params_fn,
            body_fn: Some(Arc::new(coerce)),
            error_fn: self.error_fn,
        }
    }

    pub fn child_path(&self) -> &str {
        &self.child_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unconfigured_builder_stores_nothing() {
        let builder = RouteBuilder::new();

        assert!(builder.guard_fn.is_none());
        assert!(builder.query_params_fn.is_none());
        assert!(builder.url_params_fn.is_none());
        assert!(builder.body_fn.is_none());
        assert!(builder.error_fn.is_none());
        assert_eq!(builder.child_path(), "");
    }

    #[test]
    fn last_write_wins_per_concern() {
        let builder = RouteBuilder::new()
            .coerce_body(|_| Ok("first"))
            .coerce_body(|_| Ok("second"));

        let coerce = builder.body_fn.unwrap();
        assert_eq!(coerce(&json!({})).unwrap(), "second");
    }

    #[test]
    fn chained_concerns_are_all_retained() {
        let builder = RouteBuilder::new()
            .path("/child")
            .guard(|_| GuardOutcome::allow(61u32))
            .coerce_url_params(|params| Ok(params.len()))
            .coerce_query_params(|params| Ok(params.len()))
            .coerce_body(|body| Ok(body.clone()));

        assert_eq!(builder.child_path(), "/child");
        assert!(builder.guard_fn.is_some());
        assert!(builder.url_params_fn.is_some());
        assert!(builder.query_params_fn.is_some());
        assert!(builder.body_fn.is_some());
    }
}
