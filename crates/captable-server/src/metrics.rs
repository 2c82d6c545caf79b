use axum::http::StatusCode;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// Per-route request counters and latency samples, rendered at
/// `/metrics` in a flat prometheus-style text format.
#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(latency.as_nanos() as u64);
    }

    pub(crate) async fn render(&self) -> String {
        let mut out = String::new();
        let counts = self.counts.lock().await;
        let mut count_lines: Vec<(String, u64)> = counts
            .iter()
            .map(|((route, status), n)| {
                (
                    format!("captable_requests_total{{route=\"{route}\",status=\"{status}\"}}"),
                    *n,
                )
            })
            .collect();
        drop(counts);
        count_lines.sort();
        for (key, n) in count_lines {
            out.push_str(&format!("{key} {n}\n"));
        }

        let latency_map = self.latency_ns.lock().await;
        let mut latency_lines: Vec<(String, f64)> = latency_map
            .iter()
            .map(|(route, samples)| {
                let total: u64 = samples.iter().copied().sum();
                let avg_ms = if samples.is_empty() {
                    0.0
                } else {
                    (total as f64 / samples.len() as f64) / 1_000_000.0
                };
                (
                    format!("captable_request_latency_avg_ms{{route=\"{route}\"}}"),
                    avg_ms,
                )
            })
            .collect();
        drop(latency_map);
        latency_lines.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in latency_lines {
            out.push_str(&format!("{key} {value:.3}\n"));
        }
        out
    }
}
