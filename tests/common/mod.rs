//! Shared utilities for integration testing.

use conflux::{ListenOptions, Router, ServerHandle};

/// Boot a router on an ephemeral loopback port.
#[allow(dead_code)]
pub async fn start(router: Router) -> ServerHandle {
    start_with(router, ListenOptions::default()).await
}

#[allow(dead_code)]
pub async fn start_with(router: Router, options: ListenOptions) -> ServerHandle {
    router
        .listen("127.0.0.1", 0, options)
        .await
        .expect("server should bind")
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client should build")
}

#[allow(dead_code)]
pub fn url(handle: &ServerHandle, path: &str) -> String {
    format!("http://{}{}", handle.local_addr(), path)
}
