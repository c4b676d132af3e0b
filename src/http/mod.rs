//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, per-route binding, graceful shutdown)
//!     → request.rs (request ID stamping)
//!     → [dispatch pipeline handles the request]
//!     → static_files.rs (fallback for unmatched paths, when configured)
//! ```

pub mod request;
pub mod server;
pub mod static_files;

pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::{ExitHandler, ListenOptions, ServeError, ServerHandle};
pub use static_files::{DotfilePolicy, ServeStatic, ServeStaticOptions};
