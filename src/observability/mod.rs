//! Observability subsystem.
//!
//! Structured logging via the tracing crate; every request carries an
//! `x-request-id` that shows up in spans and error logs.

pub mod logging;
