//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): lookups by game and outcome
//! - `gateway_cache_lookups_total` (counter): hits and misses by namespace
//! - `gateway_cache_entries` (gauge): stored entries
//! - `gateway_upstream_requests_total` (counter): upstream calls by provider, status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

pub fn record_lookup(game: &'static str, outcome: &'static str) {
    counter!("gateway_requests_total", "game" => game, "outcome" => outcome).increment(1);
}

pub fn record_cache_lookup(namespace: &'static str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("gateway_cache_lookups_total", "namespace" => namespace, "result" => result)
        .increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("gateway_cache_entries").set(entries as f64);
}

pub fn record_upstream_request(provider: &'static str, status: &str, start: Instant) {
    counter!(
        "gateway_upstream_requests_total",
        "provider" => provider,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_upstream_duration_seconds", "provider" => provider)
        .record(start.elapsed().as_secs_f64());
}
