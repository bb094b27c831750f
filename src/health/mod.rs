//! Liveness reporting.
//!
//! `/health` never touches an upstream: it answers as long as the process
//! serves requests. `uptime` is measured on the monotonic clock, so it never
//! decreases within one process lifetime.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::http::server::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// RFC 3339 wall-clock time of the report.
    pub timestamp: String,
    /// Seconds since process start (as recorded by `main`).
    pub uptime: f64,
}

impl HealthReport {
    pub fn since(started_at: Instant) -> Self {
        Self {
            status: "OK".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime: started_at.elapsed().as_secs_f64(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport::since(state.started_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_report_is_ok_and_uptime_grows() {
        let started_at = Instant::now();
        let first = HealthReport::since(started_at);
        std::thread::sleep(Duration::from_millis(5));
        let second = HealthReport::since(started_at);

        assert_eq!(first.status, "OK");
        assert!(second.uptime >= first.uptime);
        assert!(chrono::DateTime::parse_from_rfc3339(&first.timestamp).is_ok());
    }
}
