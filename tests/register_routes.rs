//! Registration, path composition, and verb routing over the wire.

use conflux::{ListenOptions, Outcome, RouteMethod, Router, ServeError};
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn duplicate_registrations_are_rejected_at_bind() {
    let router = Router::new("/api")
        .get("/same", |b| b, |_| Outcome::none())
        .get("/same", |b| b, |_| Outcome::none());

    let result = router.listen("127.0.0.1", 0, ListenOptions::default()).await;

    match result {
        Err(ServeError::DuplicateRoute { method, path }) => {
            assert_eq!(method, RouteMethod::Get);
            assert_eq!(path, "/api/same");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("bind should have failed"),
    }
}

#[tokio::test]
async fn segment_sequences_compose_under_the_base_path() {
    let router = Router::new("/api").get(
        ["user", "all"],
        |builder| builder,
        |_| Outcome::value(json!([{ "id": 1, "name": "John Doe" }])),
    );
    let handle = common::start(router).await;

    let response = common::client()
        .get(common::url(&handle, "/api/user/all"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!([{ "id": 1, "name": "John Doe" }])
    );
    handle.stop();
}

#[tokio::test]
async fn verbs_on_the_same_path_dispatch_independently() {
    let router = Router::new("")
        .get("/thing", |b| b, |_| Outcome::value(json!("got")))
        .post("/thing", |b| b, |_| Outcome::value(json!("posted")))
        .delete("/thing", |b| b, |_| Outcome::value(json!("deleted")));
    let handle = common::start(router).await;
    let client = common::client();

    let got: Value = client
        .get(common::url(&handle, "/thing"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let posted: Value = client
        .post(common::url(&handle, "/thing"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let deleted: Value = client
        .delete(common::url(&handle, "/thing"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!((got, posted, deleted), (json!("got"), json!("posted"), json!("deleted")));
    handle.stop();
}

#[tokio::test]
async fn unregistered_paths_are_not_found() {
    let router = Router::new("/api").get("/known", |b| b, |_| Outcome::none());
    let handle = common::start(router).await;

    let response = common::client()
        .get(common::url(&handle, "/api/unknown"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    handle.stop();
}

#[tokio::test]
async fn requests_are_stamped_with_a_request_id() {
    let router = Router::new("").get(
        "/echo-id",
        |builder| builder,
        |ctx| {
            let id = ctx
                .parts
                .headers
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("")
                .to_owned();
            Outcome::value(json!({ "request_id": id }))
        },
    );
    let handle = common::start(router).await;

    let body: Value = common::client()
        .get(common::url(&handle, "/echo-id"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let id = body["request_id"].as_str().unwrap();
    assert!(!id.is_empty());
    handle.stop();
}
