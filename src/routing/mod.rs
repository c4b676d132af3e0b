//! Route registration subsystem.
//!
//! # Responsibilities
//! - Typed per-route configuration (builder.rs)
//! - Verb registration methods and the ordered route list (router.rs)
//! - Base-path composition (path.rs)
//!
//! # Design Decisions
//! - Routes are immutable once registered
//! - Insertion order is binding order

pub mod builder;
pub mod path;
pub mod router;

pub use builder::RouteBuilder;
pub use path::append_base_path;
pub use router::{Route, RouteMethod, RoutePath, Router};
