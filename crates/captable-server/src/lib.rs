#![forbid(unsafe_code)]

//! The captable HTTP server: axum router, shared state, CORS, request
//! metrics. The store is injected at construction time and shared behind
//! a mutex; every handler is one synchronous unit of work against it.

use axum::extract::{DefaultBodyLimit, Request, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use captable_store::LedgerStore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::Mutex;

mod config;
mod http;
mod metrics;

pub use config::ApiConfig;
pub use metrics::RequestMetrics;

pub const CRATE_NAME: &str = "captable-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<LedgerStore>>,
    pub api: ApiConfig,
    pub request_id_seed: Arc<AtomicU64>,
    pub metrics: Arc<RequestMetrics>,
}

impl AppState {
    #[must_use]
    pub fn new(store: LedgerStore) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: LedgerStore, api: ApiConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            api,
            request_id_seed: Arc::new(AtomicU64::new(1)),
            metrics: Arc::new(RequestMetrics::default()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(http::ops::healthz_handler))
        .route("/version", get(http::ops::version_handler))
        .route("/metrics", get(http::ops::metrics_handler))
        .route(
            "/investors",
            get(http::investors::list_investors_handler)
                .post(http::investors::create_investor_handler),
        )
        .route(
            "/investors/:id",
            get(http::investors::get_investor_handler)
                .put(http::investors::update_investor_handler)
                .delete(http::investors::delete_investor_handler),
        )
        .route(
            "/payouts",
            get(http::payouts::list_payouts_handler).post(http::payouts::create_payout_handler),
        )
        .route("/payouts/topup", post(http::payouts::create_topup_handler))
        .route(
            "/payouts/calculate",
            post(http::payouts::distribute_handler),
        )
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

async fn cors_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(origin_value) = origin {
            if state.api.origin_allowed(&origin_value) {
                if let Ok(v) = HeaderValue::from_str(&origin_value) {
                    resp.headers_mut().insert("access-control-allow-origin", v);
                }
                resp.headers_mut().insert(
                    "access-control-allow-methods",
                    HeaderValue::from_static("GET,POST,PUT,DELETE,OPTIONS"),
                );
                resp.headers_mut().insert(
                    "access-control-allow-headers",
                    HeaderValue::from_static("content-type,x-request-id"),
                );
                resp.headers_mut()
                    .insert("access-control-max-age", HeaderValue::from_static("3600"));
            }
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(origin_value) = origin {
        if state.api.origin_allowed(&origin_value) {
            if let Ok(v) = HeaderValue::from_str(&origin_value) {
                resp.headers_mut().insert("access-control-allow-origin", v);
            }
            resp.headers_mut()
                .insert("vary", HeaderValue::from_static("Origin"));
        }
    }
    resp
}
