//! Request dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → context.rs (extract path/query params, parse JSON body)
//!     → pipeline.rs (guard → coercion → handler → normalization)
//!     → outcome.rs (result-count rule: 204 / 200-single / 200-array)
//!     → error.rs (error taxonomy and default mapper, on any phase failure)
//! ```
//!
//! # Design Decisions
//! - One pipeline shape for every route; absent concerns are no-ops
//! - Exactly one response per request, whichever branch runs
//! - Per-request state is owned by the in-flight future; concurrent requests
//!   share only the frozen, read-only route configuration

pub mod context;
pub mod error;
pub mod outcome;
pub(crate) mod pipeline;
