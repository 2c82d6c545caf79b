use super::{
    finish, ledger_error_response, propagated_request_id, require_id_path, require_json,
};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use captable_api::convert::investor_update_from_request;
use captable_api::dto::{CreateInvestorRequest, UpdateInvestorRequest};
use serde_json::json;
use std::time::Instant;
use tracing::info;

pub(crate) async fn list_investors_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/investors", "request start");
    let store = state.store.lock().await;
    let resp = match store.list_investors() {
        Ok(investors) => Json(investors).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/investors", started, &request_id, resp).await
}

pub(crate) async fn create_investor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateInvestorRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/investors", "create investor");
    let req = match require_json(body, &request_id) {
        Ok(req) => req,
        Err(resp) => return finish(&state, "/investors", started, &request_id, resp).await,
    };
    let store = state.store.lock().await;
    let resp = match store.create_investor(&req.full_name, req.invested_amount, req.share_percent)
    {
        Ok(investor) => (StatusCode::CREATED, Json(investor)).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/investors", started, &request_id, resp).await
}

pub(crate) async fn get_investor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let id = match require_id_path(path, &request_id) {
        Ok(id) => id,
        Err(resp) => return finish(&state, "/investors/{id}", started, &request_id, resp).await,
    };
    let store = state.store.lock().await;
    let resp = match store.get_investor(id) {
        Ok(investor) => Json(investor).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/investors/{id}", started, &request_id, resp).await
}

pub(crate) async fn update_investor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateInvestorRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let id = match require_id_path(path, &request_id) {
        Ok(id) => id,
        Err(resp) => return finish(&state, "/investors/{id}", started, &request_id, resp).await,
    };
    let req = match require_json(body, &request_id) {
        Ok(req) => req,
        Err(resp) => return finish(&state, "/investors/{id}", started, &request_id, resp).await,
    };
    info!(request_id = %request_id, route = "/investors/{id}", investor_id = id, "update investor");
    let update = investor_update_from_request(&req);
    let store = state.store.lock().await;
    let resp = match store.update_investor(id, &update) {
        Ok(investor) => Json(investor).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/investors/{id}", started, &request_id, resp).await
}

pub(crate) async fn delete_investor_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let id = match require_id_path(path, &request_id) {
        Ok(id) => id,
        Err(resp) => return finish(&state, "/investors/{id}", started, &request_id, resp).await,
    };
    info!(request_id = %request_id, route = "/investors/{id}", investor_id = id, "delete investor");
    let store = state.store.lock().await;
    let resp = match store.delete_investor(id) {
        Ok(()) => Json(json!({"deleted": true, "id": id})).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/investors/{id}", started, &request_id, resp).await
}
