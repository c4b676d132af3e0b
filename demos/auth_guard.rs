//! Guarded routes with url-param and body coercion.
//!
//! Run with `cargo run --example auth_guard`, then:
//! `curl -H 'Authorization: token' http://127.0.0.1:3000/api/user/42`

use axum::http::header;
use conflux::{
    GuardOutcome, ListenOptions, Outcome, RawRequest, RouteError, Router, StatusCode,
};
use serde::Serialize;
use serde_json::{json, Value};

fn auth_guard(request: &RawRequest) -> GuardOutcome<bool> {
    if request.parts.headers.contains_key(header::AUTHORIZATION) {
        GuardOutcome::allow(true)
    } else {
        GuardOutcome::deny(RouteError::app(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

#[derive(Serialize)]
struct NewUser {
    id: u64,
    name: Option<String>,
    email: Option<String>,
}

fn int_field(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|raw| raw.parse().ok()))
}

#[tokio::main]
async fn main() -> Result<(), conflux::ServeError> {
    conflux::observability::logging::init();

    let handle = Router::new("/api")
        .get(
            ["user", "all"],
            |builder| builder.guard(auth_guard),
            |_ctx| Outcome::value(json!([{ "id": 1, "name": "John Doe" }])),
        )
        .get(
            ["user", "{id}"],
            |builder| {
                builder.guard(auth_guard).coerce_url_params(|params| {
                    params
                        .get("id")
                        .and_then(|raw| raw.parse::<u64>().ok())
                        .ok_or_else(|| {
                            RouteError::app(StatusCode::BAD_REQUEST, "id must be an integer")
                        })
                })
            },
            |ctx| {
                let id = ctx.url_params.unwrap_or_default();
                Outcome::value(json!({ "id": id, "name": "John Doe" }))
            },
        )
        .post(
            "/user",
            |builder| {
                builder.coerce_body(|body| {
                    let id = int_field(&body["id"]).ok_or_else(|| {
                        RouteError::app(StatusCode::UNPROCESSABLE_ENTITY, "id must be an integer")
                    })?;
                    Ok(NewUser {
                        id,
                        name: body["name"].as_str().map(str::to_owned),
                        email: body["email"].as_str().map(str::to_owned),
                    })
                })
            },
            |ctx| Outcome::value(ctx.body),
        )
        .listen("127.0.0.1", 3000, ListenOptions::default())
        .await?;

    handle.stopped().await
}
