//! OS signal handling.
//!
//! # Responsibilities
//! - Register signal handlers (SIGINT, SIGTERM)
//! - Translate signals into the shutdown broadcast
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - The listener task ends when shutdown fires, whatever triggered it

use crate::lifecycle::shutdown::{ExitReason, Shutdown};

/// Spawn a task that turns the first OS termination signal into a shutdown
/// broadcast. The task also exits if shutdown is triggered elsewhere.
pub(crate) fn spawn_listener(shutdown: Shutdown) {
    let mut rx = shutdown.subscribe();
    tokio::spawn(async move {
        tokio::select! {
            name = wait_for_signal() => {
                tracing::info!(signal = name, "shutdown signal received");
                shutdown.trigger(ExitReason::Signal(name));
            }
            _ = rx.recv() => {}
        }
    });
}

#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(error) => {
            tracing::error!(%error, "failed to install SIGTERM handler");
            wait_for_interrupt().await;
            return "SIGINT";
        }
    };

    tokio::select! {
        _ = wait_for_interrupt() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    wait_for_interrupt().await;
    "SIGINT"
}

async fn wait_for_interrupt() {
    if tokio::signal::ctrl_c().await.is_err() {
        // registration failed; park rather than busy-loop
        std::future::pending::<()>().await;
    }
}
