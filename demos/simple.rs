//! Minimal router: one GET route under a base path.
//!
//! Run with `cargo run --example simple`, then:
//! `curl http://127.0.0.1:3000/api/hello`

use conflux::{ListenOptions, Outcome, Router};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), conflux::ServeError> {
    conflux::observability::logging::init();

    let handle = Router::new("/api")
        .get(
            "/hello",
            |builder| builder,
            |_ctx| Outcome::value(json!({ "message": "Hello, world!" })),
        )
        .listen("127.0.0.1", 3000, ListenOptions::default())
        .await?;

    handle.stopped().await
}
