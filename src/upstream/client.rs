//! Outbound HTTP client for upstream game APIs.
//!
//! # Responsibilities
//! - Attach the provider credential and timeout to every call
//! - Read the body once and keep it as JSON (or a JSON string when the
//!   upstream answers with something else)
//! - Translate transport failures into [`UpstreamError`]
//!
//! One attempt per call. Retries and fallbacks are decided by the caller.

use serde_json::Value;
use std::time::Instant;
use url::Url;

use crate::observability::metrics;
use crate::upstream::providers::Provider;
use crate::upstream::types::{UpstreamError, UpstreamResult};

/// Thin wrapper over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    pub fn new() -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("game-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        Ok(Self { http })
    }

    /// Issue a GET against `url` on behalf of `provider` and return the
    /// decoded body of a 2xx response.
    pub async fn get_json(&self, provider: &Provider, url: Url) -> UpstreamResult<Value> {
        let start = Instant::now();
        let timeout = provider.timeout();

        tracing::debug!(provider = provider.name(), url = %url, "Calling upstream");

        let mut request = self.http.get(url).timeout(timeout);
        if let Some((name, value)) = provider.auth_header() {
            request = request.header(name.clone(), value.clone());
        }

        let result = async {
            let response = request.send().await.map_err(|e| transport_error(e, timeout.as_millis()))?;
            let status = response.status();
            let bytes = response
                .bytes()
                .await
                .map_err(|e| transport_error(e, timeout.as_millis()))?;
            let body = decode_body(&bytes);

            if status.is_success() {
                Ok(body)
            } else {
                Err(UpstreamError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
        .await;

        let label = match &result {
            Ok(_) => "ok".to_string(),
            Err(UpstreamError::Status { status, .. }) => status.to_string(),
            Err(UpstreamError::Timeout(_)) => "timeout".to_string(),
            Err(_) => "error".to_string(),
        };
        metrics::record_upstream_request(provider.name(), &label, start);

        if let Err(e) = &result {
            tracing::warn!(provider = provider.name(), status = %label, error = %e, "Upstream call failed");
        }
        result
    }
}

fn transport_error(error: reqwest::Error, timeout_ms: u128) -> UpstreamError {
    if error.is_timeout() {
        UpstreamError::Timeout(timeout_ms as u64)
    } else {
        UpstreamError::Transport(error.to_string())
    }
}

/// Upstream bodies are opaque; non-JSON bodies become a JSON string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
