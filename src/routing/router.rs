//! Route registration and the router's public verb surface.
//!
//! # Responsibilities
//! - Store registered routes in insertion order
//! - Expose one registration method per HTTP verb, all delegating to a
//!   single internal routine
//! - Hand the ordered route list to the transport at listen time
//!
//! # Design Decisions
//! - The builder function runs exactly once, synchronously, at registration
//! - The typed builder and handler are erased into the route's dispatch
//!   service immediately, so the route list stays homogeneous
//! - No duplicate validation at registration; exact method+path duplicates
//!   fail at bind time; overlapping patterns are the transport's business
//! - `listen` consumes the router, so registration after listen cannot compile

use axum::routing::MethodFilter;

use crate::dispatch::context::DispatchContext;
use crate::dispatch::error::RouteError;
use crate::dispatch::outcome::Outcome;
use crate::dispatch::pipeline::{self, DispatchFn};
use crate::http::server::{self, ListenOptions, ServeError, ServerHandle};
use crate::routing::builder::RouteBuilder;
use crate::routing::path::append_base_path;

/// The HTTP verbs a route can be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl RouteMethod {
    pub(crate) fn filter(self) -> MethodFilter {
        match self {
            RouteMethod::Get => MethodFilter::GET,
            RouteMethod::Put => MethodFilter::PUT,
            RouteMethod::Post => MethodFilter::POST,
            RouteMethod::Patch => MethodFilter::PATCH,
            RouteMethod::Delete => MethodFilter::DELETE,
        }
    }
}

impl std::fmt::Display for RouteMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RouteMethod::Get => "GET",
            RouteMethod::Put => "PUT",
            RouteMethod::Post => "POST",
            RouteMethod::Patch => "PATCH",
            RouteMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A registered route: verb, full path, and the frozen dispatch service.
pub struct Route {
    pub method: RouteMethod,
    pub path: String,
    pub(crate) service: DispatchFn,
}

/// A route path: a single string, or an ordered sequence of segments that is
/// joined with `/` before base-path prefixing.
pub trait RoutePath {
    fn into_path(self) -> String;
}

impl RoutePath for &str {
    fn into_path(self) -> String {
        self.to_owned()
    }
}

impl RoutePath for String {
    fn into_path(self) -> String {
        self
    }
}

impl<T: AsRef<str>> RoutePath for &[T] {
    fn into_path(self) -> String {
        join_segments(self.iter())
    }
}

impl<T: AsRef<str>> RoutePath for Vec<T> {
    fn into_path(self) -> String {
        join_segments(self.iter())
    }
}

impl<T: AsRef<str>, const N: usize> RoutePath for [T; N] {
    fn into_path(self) -> String {
        join_segments(self.iter())
    }
}

fn join_segments<'a, T: AsRef<str> + 'a>(segments: impl Iterator<Item = &'a T>) -> String {
    segments
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

/// Ordered collection of routes under one base path.
///
/// Registration is fluent: every verb method consumes and returns the router.
/// Path patterns use the transport's capture syntax, e.g. `/user/{id}`.
pub struct Router {
    base_url: String,
    routes: Vec<Route>,
}

impl Router {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_url: base_path.into(),
            routes: Vec::new(),
        }
    }

    /// The registered routes, in registration (and binding) order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    pub fn get<P, F, H, Q, U, B, G>(self, path: P, builder_fn: F, handler: H) -> Self
    where
        P: RoutePath,
        F: FnOnce(RouteBuilder) -> RouteBuilder<Q, U, B, G>,
        H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError>
            + Send
            + Sync
            + 'static,
        Q: Send + 'static,
        U: Send + 'static,
        B: Send + 'static,
        G: Send + 'static,
    {
        self.register(RouteMethod::Get, path, builder_fn, handler)
    }

    pub fn put<P, F, H, Q, U, B, G>(self, path: P, builder_fn: F, handler: H) -> Self
    where
        P: RoutePath,
        F: FnOnce(RouteBuilder) -> RouteBuilder<Q, U, B, G>,
        H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError>
            + Send
            + Sync
            + 'static,
        Q: Send + 'static,
        U: Send + 'static,
        B: Send + 'static,
        G: Send + 'static,
    {
        self.register(RouteMethod::Put, path, builder_fn, handler)
    }

    pub fn post<P, F, H, Q, U, B, G>(self, path: P, builder_fn: F, handler: H) -> Self
    where
        P: RoutePath,
        F: FnOnce(RouteBuilder) -> RouteBuilder<Q, U, B, G>,
        H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError>
            + Send
            + Sync
            + 'static,
        Q: Send + 'static,
        U: Send + 'static,
        B: Send + 'static,
        G: Send + 'static,
    {
        self.register(RouteMethod::Post, path, builder_fn, handler)
    }

    pub fn patch<P, F, H, Q, U, B, G>(self, path: P, builder_fn: F, handler: H) -> Self
    where
        P: RoutePath,
        F: FnOnce(RouteBuilder) -> RouteBuilder<Q, U, B, G>,
        H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError>
            + Send
            + Sync
            + 'static,
        Q: Send + 'static,
        U: Send + 'static,
        B: Send + 'static,
        G: Send + 'static,
    {
        self.register(RouteMethod::Patch, path, builder_fn, handler)
    }

    pub fn delete<P, F, H, Q, U, B, G>(self, path: P, builder_fn: F, handler: H) -> Self
    where
        P: RoutePath,
        F: FnOnce(RouteBuilder) -> RouteBuilder<Q, U, B, G>,
        H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError>
            + Send
            + Sync
            + 'static,
        Q: Send + 'static,
        U: Send + 'static,
        B: Send + 'static,
        G: Send + 'static,
    {
        self.register(RouteMethod::Delete, path, builder_fn, handler)
    }

    fn register<P, F, H, Q, U, B, G>(
        mut self,
        method: RouteMethod,
        path: P,
        builder_fn: F,
        handler: H,
    ) -> Self
    where
        P: RoutePath,
        F: FnOnce(RouteBuilder) -> RouteBuilder<Q, U, B, G>,
        H: Fn(DispatchContext<Q, U, B, G>) -> Result<Outcome, RouteError>
            + Send
            + Sync
            + 'static,
        Q: Send + 'static,
        U: Send + 'static,
        B: Send + 'static,
        G: Send + 'static,
    {
        let builder = builder_fn(RouteBuilder::new());
        let full_path = append_base_path(&self.base_url, &path.into_path());
        let service = pipeline::dispatch_service(builder, handler);

        self.routes.push(Route {
            method,
            path: full_path,
            service,
        });

        self
    }

    /// Bind every registered route and start accepting connections on
    /// `hostname:port`.
    ///
    /// Duplicate method+path registrations are stored as-is; binding them
    /// fails with [`ServeError::DuplicateRoute`].
    pub async fn listen(
        self,
        hostname: &str,
        port: u16,
        options: ListenOptions,
    ) -> Result<ServerHandle, ServeError> {
        server::serve(self, hostname, port, options).await
    }
}
