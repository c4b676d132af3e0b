//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGINT/SIGTERM (signals.rs)  ┐
//! ServerHandle::stop           ┴→ Shutdown broadcast (shutdown.rs)
//!     → on_exit hook runs once
//!     → accept loop drains and the listener closes
//! ```

pub mod shutdown;
pub(crate) mod signals;

pub use shutdown::{ExitReason, Shutdown};
