use captable_server::{build_router, ApiConfig, AppState};
use captable_store::LedgerStore;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_server() -> std::net::SocketAddr {
    let store = LedgerStore::open_in_memory().expect("open in-memory store");
    let state = AppState::with_config(store, ApiConfig::default());
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn send_raw(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&str>,
    headers: &[(&str, &str)],
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let payload = body.unwrap_or_default();
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    if body.is_some() {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    req.push_str("\r\n");
    req.push_str(payload);
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

async fn send_json(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: &Value,
) -> (u16, Value) {
    let payload = body.to_string();
    let (status, _, raw) = send_raw(addr, method, path, Some(&payload), &[]).await;
    let value = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw).expect("json response body")
    };
    (status, value)
}

async fn get_json(addr: std::net::SocketAddr, path: &str) -> (u16, Value) {
    let (status, _, raw) = send_raw(addr, "GET", path, None, &[]).await;
    let value = if raw.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&raw).expect("json response body")
    };
    (status, value)
}

fn error_code(body: &Value) -> &str {
    body.get("error")
        .and_then(|e| e.get("code"))
        .and_then(Value::as_str)
        .expect("error code")
}

async fn create_investor(addr: std::net::SocketAddr, name: &str, amount: f64, share: f64) -> i64 {
    let (status, body) = send_json(
        addr,
        "POST",
        "/investors",
        &json!({"full_name": name, "invested_amount": amount, "share_percent": share}),
    )
    .await;
    assert_eq!(status, 201);
    body["id"].as_i64().expect("investor id")
}

#[tokio::test]
async fn health_version_and_metrics_endpoints_respond() {
    let addr = spawn_server().await;
    let (status, headers, body) = send_raw(addr, "GET", "/healthz", None, &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
    assert!(headers.contains("x-request-id: "));

    let (status, body) = get_json(addr, "/version").await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "captable");

    let (status, _, metrics) = send_raw(addr, "GET", "/metrics", None, &[]).await;
    assert_eq!(status, 200);
    assert!(metrics.contains("captable_requests_total{route=\"/healthz\",status=\"200\"}"));
}

#[tokio::test]
async fn investor_create_read_update_delete_flow() {
    let addr = spawn_server().await;
    let id = create_investor(addr, "Ada Example", 1_000.0, 37.0).await;

    let (status, listed) = get_json(addr, "/investors").await;
    assert_eq!(status, 200);
    assert_eq!(listed.as_array().expect("array").len(), 1);
    assert_eq!(listed[0]["share_percent"], 37.0);

    let (status, updated) = send_json(
        addr,
        "PUT",
        &format!("/investors/{id}"),
        &json!({"full_name": "Ada Renamed"}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["full_name"], "Ada Renamed");
    // Partial update leaves untouched columns alone.
    assert_eq!(updated["invested_amount"], 1_000.0);
    assert_eq!(updated["share_percent"], 37.0);

    let (status, fetched) = get_json(addr, &format!("/investors/{id}")).await;
    assert_eq!(status, 200);
    assert_eq!(fetched["full_name"], "Ada Renamed");

    let (status, deleted) = send_json(addr, "DELETE", &format!("/investors/{id}"), &json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(deleted["deleted"], true);

    let (status, body) = get_json(addr, &format!("/investors/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "NotFound");
}

#[tokio::test]
async fn share_is_coerced_on_create_and_rejected_on_update() {
    let addr = spawn_server().await;
    let (status, created) = send_json(
        addr,
        "POST",
        "/investors",
        &json!({"full_name": "x", "invested_amount": 0.0, "share_percent": 150.0}),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(created["share_percent"], 50.0);
    let id = created["id"].as_i64().expect("id");

    for bad in [0.0, 150.0] {
        let (status, body) = send_json(
            addr,
            "PUT",
            &format!("/investors/{id}"),
            &json!({"share_percent": bad}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(error_code(&body), "ValidationFailed");
    }
    let (_, current) = get_json(addr, &format!("/investors/{id}")).await;
    assert_eq!(current["share_percent"], 50.0);
}

#[tokio::test]
async fn negative_principal_is_rejected_on_create() {
    let addr = spawn_server().await;
    let (status, body) = send_json(
        addr,
        "POST",
        "/investors",
        &json!({"full_name": "x", "invested_amount": -1.0}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "ValidationFailed");
}

#[tokio::test]
async fn malformed_bodies_and_path_ids_map_to_400_envelopes() {
    let addr = spawn_server().await;
    let (status, _, raw) = send_raw(addr, "POST", "/investors", Some("{not json"), &[]).await;
    assert_eq!(status, 400);
    let body: Value = serde_json::from_str(&raw).expect("error body");
    assert_eq!(error_code(&body), "InvalidJsonBody");

    let (status, body) = get_json(addr, "/investors/abc").await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "InvalidPathParameter");
}

#[tokio::test]
async fn payout_sign_is_normalized_and_zero_is_rejected() {
    let addr = spawn_server().await;
    let id = create_investor(addr, "Holder", 1_000.0, 50.0).await;

    let (status, stored) = send_json(
        addr,
        "POST",
        "/payouts",
        &json!({
            "investor_id": id,
            "date": "2024-05-10",
            "payout_amount": 500.0,
            "is_withdrawal_capital": true
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(stored["payout_amount"], -500.0);
    assert_eq!(stored["period_date"], "2024-05-10");
    assert!(stored["period_month"].is_null());
    assert_eq!(stored["is_topup"], false);

    let (status, stored) = send_json(
        addr,
        "POST",
        "/payouts",
        &json!({
            "investor_id": id,
            "date": "2024-05-10",
            "payout_amount": -200.0
        }),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(stored["payout_amount"], 200.0);

    let (status, body) = send_json(
        addr,
        "POST",
        "/payouts",
        &json!({
            "investor_id": id,
            "date": "2024-05-10",
            "payout_amount": 0.0,
            "is_withdrawal_capital": true
        }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "ValidationFailed");
}

#[tokio::test]
async fn topup_requires_positive_amount_and_sets_the_flag() {
    let addr = spawn_server().await;
    let id = create_investor(addr, "Holder", 1_000.0, 50.0).await;

    for bad in [0.0, -10.0] {
        let (status, body) = send_json(
            addr,
            "POST",
            "/payouts/topup",
            &json!({"investor_id": id, "date": "2024-05-10", "amount": bad}),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(error_code(&body), "ValidationFailed");
    }

    let (status, stored) = send_json(
        addr,
        "POST",
        "/payouts/topup",
        &json!({"investor_id": id, "date": "2024-05-10", "amount": 150.0}),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(stored["is_topup"], true);
    assert_eq!(stored["payout_amount"], 150.0);
    assert_eq!(stored["reinvest"], false);
    assert_eq!(stored["is_withdrawal_capital"], false);
}

#[tokio::test]
async fn distribution_run_is_proportional_to_shares() {
    let addr = spawn_server().await;
    for (name, share) in [("a", 20.0), ("b", 30.0), ("c", 50.0)] {
        create_investor(addr, name, 0.0, share).await;
    }
    let (status, created) = send_json(
        addr,
        "POST",
        "/payouts/calculate",
        &json!({"period_month": "2024-06", "company_revenue": 1000.0}),
    )
    .await;
    assert_eq!(status, 200);
    let rows = created.as_array().expect("payout array");
    assert_eq!(rows.len(), 3);
    let amounts: Vec<f64> = rows
        .iter()
        .map(|p| p["payout_amount"].as_f64().expect("amount"))
        .collect();
    assert_eq!(amounts, vec![200.0, 300.0, 500.0]);
    assert_eq!(amounts.iter().sum::<f64>(), 1000.0);
    for row in rows {
        assert_eq!(row["period_month"], "2024-06");
        assert!(row["period_date"].is_null());
        assert_eq!(row["company_revenue"], 1000.0);
    }
}

#[tokio::test]
async fn payouts_list_is_ordered_by_period() {
    let addr = spawn_server().await;
    let id = create_investor(addr, "Holder", 0.0, 50.0).await;
    let (status, _) = send_json(
        addr,
        "POST",
        "/payouts",
        &json!({"investor_id": id, "date": "2024-07-15", "payout_amount": 10.0}),
    )
    .await;
    assert_eq!(status, 201);
    let (status, _) = send_json(
        addr,
        "POST",
        "/payouts/calculate",
        &json!({"period_month": "2024-07", "company_revenue": 100.0}),
    )
    .await;
    assert_eq!(status, 200);
    let (status, _) = send_json(
        addr,
        "POST",
        "/payouts/topup",
        &json!({"investor_id": id, "date": "2024-06-01", "amount": 5.0}),
    )
    .await;
    assert_eq!(status, 201);

    let (status, listed) = get_json(addr, "/payouts").await;
    assert_eq!(status, 200);
    let periods: Vec<String> = listed
        .as_array()
        .expect("payout array")
        .iter()
        .map(|p| {
            p["period_date"]
                .as_str()
                .or_else(|| p["period_month"].as_str())
                .expect("one period field")
                .to_string()
        })
        .collect();
    assert_eq!(periods, vec!["2024-06-01", "2024-07", "2024-07-15"]);
}

#[tokio::test]
async fn unknown_ids_map_to_404() {
    let addr = spawn_server().await;
    let (status, body) = send_json(addr, "DELETE", "/investors/99", &json!({})).await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "NotFound");

    let (status, body) = send_json(
        addr,
        "POST",
        "/payouts",
        &json!({"investor_id": 99, "date": "2024-05-10", "payout_amount": 100.0}),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "NotFound");

    let (status, body) = send_json(
        addr,
        "POST",
        "/payouts/topup",
        &json!({"investor_id": 99, "date": "2024-05-10", "amount": 100.0}),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(error_code(&body), "NotFound");
}

#[tokio::test]
async fn malformed_dates_and_months_map_to_400() {
    let addr = spawn_server().await;
    let id = create_investor(addr, "Holder", 0.0, 50.0).await;

    let (status, body) = send_json(
        addr,
        "POST",
        "/payouts",
        &json!({"investor_id": id, "date": "2024-13-40", "payout_amount": 10.0}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "ValidationFailed");

    let (status, body) = send_json(
        addr,
        "POST",
        "/payouts/calculate",
        &json!({"period_month": "June 2024", "company_revenue": 100.0}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(error_code(&body), "ValidationFailed");
}

#[tokio::test]
async fn cors_preflight_and_echoed_origin() {
    let addr = spawn_server().await;
    let (status, headers, _) = send_raw(
        addr,
        "OPTIONS",
        "/investors",
        None,
        &[("Origin", "http://localhost:5173")],
    )
    .await;
    assert_eq!(status, 204);
    assert!(headers.contains("access-control-allow-origin: http://localhost:5173"));
    assert!(headers.contains("access-control-allow-methods: GET,POST,PUT,DELETE,OPTIONS"));

    let (status, headers, _) = send_raw(
        addr,
        "GET",
        "/investors",
        None,
        &[("Origin", "http://localhost:5173")],
    )
    .await;
    assert_eq!(status, 200);
    assert!(headers.contains("access-control-allow-origin: http://localhost:5173"));
    assert!(headers.contains("vary: Origin"));
}

#[tokio::test]
async fn inbound_request_id_is_propagated() {
    let addr = spawn_server().await;
    let (status, headers, _) = send_raw(
        addr,
        "GET",
        "/investors",
        None,
        &[("x-request-id", "req-from-client")],
    )
    .await;
    assert_eq!(status, 200);
    assert!(headers.contains("x-request-id: req-from-client"));
}
