use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use captable_api::error_mapping::map_error;
use captable_api::ApiError;
use captable_store::LedgerError;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::error;

pub(crate) mod investors;
pub(crate) mod ops;
pub(crate) mod payouts;

pub(crate) fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

/// An inbound `x-request-id` wins; otherwise mint a process-local one.
pub(crate) fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

pub(crate) fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

pub(crate) fn error_response(err: &ApiError) -> Response {
    let status = StatusCode::from_u16(map_error(err).status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"error": err}))).into_response()
}

pub(crate) fn ledger_error_response(err: &LedgerError, request_id: &str) -> Response {
    let api_err = match err {
        LedgerError::Validation(msg) => ApiError::validation_failed(msg.clone()),
        LedgerError::NotFound(msg) => ApiError::not_found(msg.clone()),
        LedgerError::Storage(msg) => {
            error!(request_id = %request_id, "storage failure: {msg}");
            ApiError::storage_failure(msg.clone())
        }
        other => {
            let msg = other.to_string();
            error!(request_id = %request_id, "storage failure: {msg}");
            ApiError::storage_failure(msg)
        }
    };
    error_response(&api_err.with_request_id(request_id))
}

/// Observes route metrics and stamps the request id; the tail call of
/// every handler.
pub(crate) async fn finish(
    state: &AppState,
    route: &'static str,
    started: Instant,
    request_id: &str,
    resp: Response,
) -> Response {
    state
        .metrics
        .observe_request(route, resp.status(), started.elapsed())
        .await;
    with_request_id(resp, request_id)
}

/// Maps a malformed JSON body onto the 400 envelope instead of axum's
/// default rejection.
pub(crate) fn require_json<T>(
    body: Result<Json<T>, JsonRejection>,
    request_id: &str,
) -> Result<T, Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            let err = ApiError::invalid_json_body(rejection.body_text()).with_request_id(request_id);
            Err(error_response(&err))
        }
    }
}

/// Same for non-numeric `:id` path segments.
pub(crate) fn require_id_path(
    path: Result<Path<i64>, PathRejection>,
    request_id: &str,
) -> Result<i64, Response> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            let err = ApiError::invalid_path_parameter("id", &rejection.body_text())
                .with_request_id(request_id);
            Err(error_response(&err))
        }
    }
}
