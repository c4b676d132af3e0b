//! Declarative routing layer over an axum transport.
//!
//! Routes are registered fluently with an optional guard, independent
//! coercion functions for url params, query params, and the body, and a
//! handler that may return an immediate value, a deferred value, or a
//! push-sequence of values. Every outcome is normalized into one uniform
//! JSON response protocol with a single error taxonomy.
//!
//! ```no_run
//! use conflux::{ListenOptions, Outcome, Router};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), conflux::ServeError> {
//!     conflux::observability::logging::init();
//!
//!     let handle = Router::new("/api")
//!         .get(
//!             "/hello",
//!             |builder| builder,
//!             |_ctx| Outcome::value(json!({ "message": "Hello, world!" })),
//!         )
//!         .listen("127.0.0.1", 3000, ListenOptions::default())
//!         .await?;
//!
//!     handle.stopped().await
//! }
//! ```

pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use dispatch::context::{DispatchContext, PathParams, QueryParams, QueryValue, RawRequest};
pub use dispatch::error::{RouteError, StatusMessage};
pub use dispatch::outcome::{GuardOutcome, Outcome};
pub use http::server::{ExitHandler, ListenOptions, ServeError, ServerHandle};
pub use http::static_files::{DotfilePolicy, ServeStatic, ServeStaticOptions};
pub use lifecycle::shutdown::{ExitReason, Shutdown};
pub use routing::{append_base_path, Route, RouteBuilder, RouteMethod, RoutePath, Router};

pub use axum::http::StatusCode;
