use super::{error_response, finish, ledger_error_response, propagated_request_id, require_json};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use captable_api::convert::{payout_to_wire, payouts_to_wire};
use captable_api::dto::{CreatePayoutRequest, CreateTopupRequest, DistributeRequest};
use captable_api::ApiError;
use captable_model::{
    parse_calendar_date, validate_payout_amount, validate_topup_amount, NewPayout, PeriodMonth,
};
use std::time::Instant;
use tracing::info;

pub(crate) async fn list_payouts_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/payouts", "request start");
    let store = state.store.lock().await;
    let resp = match store.list_payouts() {
        Ok(payouts) => Json(payouts_to_wire(&payouts)).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/payouts", started, &request_id, resp).await
}

pub(crate) async fn create_payout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreatePayoutRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/payouts", "create payout");
    let req = match require_json(body, &request_id) {
        Ok(req) => req,
        Err(resp) => return finish(&state, "/payouts", started, &request_id, resp).await,
    };
    // The zero check precedes date parsing; the store repeats it before
    // normalizing the sign.
    if let Err(e) = validate_payout_amount(req.payout_amount) {
        let resp =
            error_response(&ApiError::validation_failed(e.to_string()).with_request_id(&request_id));
        return finish(&state, "/payouts", started, &request_id, resp).await;
    }
    let date = match parse_calendar_date(&req.date) {
        Ok(date) => date,
        Err(e) => {
            let resp = error_response(
                &ApiError::validation_failed(e.to_string()).with_request_id(&request_id),
            );
            return finish(&state, "/payouts", started, &request_id, resp).await;
        }
    };
    let new = NewPayout {
        investor_id: req.investor_id,
        date,
        payout_amount: req.payout_amount,
        reinvest: req.reinvest,
        is_withdrawal_profit: req.is_withdrawal_profit,
        is_withdrawal_capital: req.is_withdrawal_capital,
    };
    let store = state.store.lock().await;
    let resp = match store.create_payout(&new) {
        Ok(payout) => (StatusCode::CREATED, Json(payout_to_wire(&payout))).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/payouts", started, &request_id, resp).await
}

pub(crate) async fn create_topup_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateTopupRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    info!(request_id = %request_id, route = "/payouts/topup", "create top-up");
    let req = match require_json(body, &request_id) {
        Ok(req) => req,
        Err(resp) => return finish(&state, "/payouts/topup", started, &request_id, resp).await,
    };
    if let Err(e) = validate_topup_amount(req.amount) {
        let resp =
            error_response(&ApiError::validation_failed(e.to_string()).with_request_id(&request_id));
        return finish(&state, "/payouts/topup", started, &request_id, resp).await;
    }
    let date = match parse_calendar_date(&req.date) {
        Ok(date) => date,
        Err(e) => {
            let resp = error_response(
                &ApiError::validation_failed(e.to_string()).with_request_id(&request_id),
            );
            return finish(&state, "/payouts/topup", started, &request_id, resp).await;
        }
    };
    let store = state.store.lock().await;
    let resp = match store.create_topup(req.investor_id, date, req.amount) {
        Ok(payout) => (StatusCode::CREATED, Json(payout_to_wire(&payout))).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/payouts/topup", started, &request_id, resp).await
}

pub(crate) async fn distribute_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DistributeRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request_id = propagated_request_id(&headers, &state);
    let req = match require_json(body, &request_id) {
        Ok(req) => req,
        Err(resp) => {
            return finish(&state, "/payouts/calculate", started, &request_id, resp).await
        }
    };
    let month = match PeriodMonth::parse(&req.period_month) {
        Ok(month) => month,
        Err(e) => {
            let resp = error_response(
                &ApiError::validation_failed(e.to_string()).with_request_id(&request_id),
            );
            return finish(&state, "/payouts/calculate", started, &request_id, resp).await;
        }
    };
    info!(
        request_id = %request_id,
        route = "/payouts/calculate",
        period = %month,
        "distribution run"
    );
    let mut store = state.store.lock().await;
    let resp = match store.distribute_for_month(month, req.company_revenue) {
        Ok(payouts) => Json(payouts_to_wire(&payouts)).into_response(),
        Err(e) => ledger_error_response(&e, &request_id),
    };
    drop(store);
    finish(&state, "/payouts/calculate", started, &request_id, resp).await
}
