//! Transport binding: turns a configured router into a live server.
//!
//! # Responsibilities
//! - Bind every registered route onto the axum router, in insertion order
//! - Install the static-file fallback when configured
//! - Wire up middleware (tracing, request ID)
//! - Bind the listener, spawn the serve task, wire graceful shutdown
//!
//! # Design Decisions
//! - `serve` returns a handle immediately; the accept loop runs on a spawned
//!   task so callers can stop or await it
//! - Shutdown funnels through one broadcast coordinator, whether it came from
//!   an OS signal or `ServerHandle::stop`
//! - The `on_exit` hook runs once, when shutdown begins

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::extract::Request;
use axum::routing::on;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::dispatch::context::RawRequest;
use crate::http::request::RequestIdLayer;
use crate::http::static_files::{self, ServeStatic};
use crate::lifecycle::shutdown::{ExitReason, Shutdown};
use crate::lifecycle::signals;
use crate::routing::{RouteMethod, Router};

/// Callback invoked once when the server begins shutting down.
pub type ExitHandler = Box<dyn FnOnce(ExitReason) + Send + 'static>;

/// Options for [`Router::listen`].
#[derive(Default)]
pub struct ListenOptions {
    /// Runs when shutdown begins. Without one, the reason is only logged.
    pub on_exit: Option<ExitHandler>,
    /// Serve files from a directory for any path no route matched.
    pub serve_static: Option<ServeStatic>,
}

/// Errors surfaced while binding or running the server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("duplicate route: {method} {path}")]
    DuplicateRoute { method: RouteMethod, path: String },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
    #[error("server task aborted")]
    Aborted,
}

/// Handle to a running server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl ServerHandle {
    /// The address the server actually bound (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Ask the server to shut down gracefully.
    pub fn stop(&self) {
        self.shutdown.trigger(ExitReason::Stopped);
    }

    /// Wait until the server has fully stopped.
    pub async fn stopped(self) -> Result<(), ServeError> {
        match self.task.await {
            Ok(result) => result.map_err(ServeError::from),
            Err(_) => Err(ServeError::Aborted),
        }
    }
}

pub(crate) async fn serve(
    router: Router,
    hostname: &str,
    port: u16,
    options: ListenOptions,
) -> Result<ServerHandle, ServeError> {
    let ListenOptions {
        on_exit,
        serve_static,
    } = options;

    // the transport panics on exact method+path duplicates; scan first so
    // the caller gets an error instead
    let routes = router.into_routes();
    let mut seen = HashSet::with_capacity(routes.len());
    for route in &routes {
        if !seen.insert((route.method, route.path.clone())) {
            return Err(ServeError::DuplicateRoute {
                method: route.method,
                path: route.path.clone(),
            });
        }
    }

    let mut app = axum::Router::new();
    for route in routes {
        tracing::info!(method = %route.method, path = %route.path, "route bound");

        let dispatch = route.service;
        let endpoint = move |request: Request| {
            let dispatch = dispatch.clone();
            async move {
                match RawRequest::from_request(request).await {
                    Ok(raw) => dispatch(raw).await,
                    Err(rejection) => rejection,
                }
            }
        };
        app = app.route(&route.path, on(route.method.filter(), endpoint));
    }

    if let Some(config) = serve_static {
        app = app.fallback_service(static_files::router(config));
    }

    let app = app.layer(TraceLayer::new_for_http()).layer(RequestIdLayer);

    let addr = format!("{hostname}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "conflux listening");

    let shutdown = Shutdown::new();
    signals::spawn_listener(shutdown.clone());

    let mut rx = shutdown.subscribe();
    let graceful = async move {
        let reason = rx.recv().await.unwrap_or(ExitReason::Stopped);
        match on_exit {
            Some(on_exit) => on_exit(reason),
            None => tracing::info!(%reason, "shutting down"),
        }
    };

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(graceful)
            .await
    });

    Ok(ServerHandle {
        local_addr,
        shutdown,
        task,
    })
}
