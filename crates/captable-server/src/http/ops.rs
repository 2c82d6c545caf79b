use super::{finish, make_request_id};
use crate::{AppState, CRATE_NAME};
use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::time::Instant;

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let resp = "ok".into_response();
    finish(&state, "/healthz", started, &request_id, resp).await
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let payload = json!({
        "name": "captable",
        "version": env!("CARGO_PKG_VERSION"),
        "crate": CRATE_NAME,
    });
    let mut resp = Json(payload).into_response();
    resp.headers_mut().insert(
        "cache-control",
        HeaderValue::from_static("public, max-age=30"),
    );
    finish(&state, "/version", started, &request_id, resp).await
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let started = Instant::now();
    let request_id = make_request_id(&state);
    let body = state.metrics.render().await;
    let resp = body.into_response();
    finish(&state, "/metrics", started, &request_id, resp).await
}
