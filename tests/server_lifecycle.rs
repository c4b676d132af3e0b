//! Graceful shutdown and exit-hook behavior.

use conflux::{ExitReason, ListenOptions, Outcome, Router};
use serde_json::json;
use tokio::sync::oneshot;

mod common;

#[tokio::test]
async fn stop_runs_the_exit_hook_and_unblocks_stopped() {
    let (tx, rx) = oneshot::channel();

    let router = Router::new("").get("/ping", |b| b, |_| Outcome::value(json!("pong")));
    let options = ListenOptions {
        on_exit: Some(Box::new(move |reason| {
            let _ = tx.send(reason);
        })),
        serve_static: None,
    };
    let handle = common::start_with(router, options).await;

    // the server answers before shutdown
    let response = common::client()
        .get(common::url(&handle, "/ping"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    handle.stop();
    assert_eq!(rx.await.unwrap(), ExitReason::Stopped);
    handle.stopped().await.unwrap();
}

#[tokio::test]
async fn stopped_server_releases_its_port() {
    let router = Router::new("").get("/ping", |b| b, |_| Outcome::none());
    let handle = common::start(router).await;
    let addr = handle.local_addr();

    handle.stop();
    handle.stopped().await.unwrap();

    // the listener is closed, so the port can be bound again
    let rebound = tokio::net::TcpListener::bind(addr).await;
    assert!(rebound.is_ok());
}
