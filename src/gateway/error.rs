//! Gateway error kinds and upstream failure classification.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::gateway::identifier::IdentifierError;
use crate::upstream::types::UpstreamError;

/// Every way a gateway request can end without data.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Identifier rejected locally.
    #[error("{0}")]
    Validation(#[from] IdentifierError),

    /// Upstream answered with a non-2xx status.
    #[error("{provider} error: {status}")]
    UpstreamHttp {
        provider: &'static str,
        status: u16,
        body: Value,
    },

    /// Network failure, timeout, or anything else without an upstream status.
    #[error("{provider} server error")]
    UpstreamTransport {
        provider: &'static str,
        message: String,
    },

    #[error("Route not found: {method} {uri}")]
    NotFoundRoute { method: String, uri: String },

    #[error("Internal server error")]
    Unhandled,
}

impl GatewayError {
    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamHttp { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::UpstreamTransport { .. } | GatewayError::Unhandled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::NotFoundRoute { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Extra context surfaced as `details` in the envelope.
    pub fn details(&self) -> Option<Value> {
        match self {
            GatewayError::UpstreamHttp { body, .. } => Some(body.clone()),
            GatewayError::UpstreamTransport { message, .. } => Some(Value::String(message.clone())),
            _ => None,
        }
    }

    /// Short label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "rejected",
            GatewayError::UpstreamHttp { .. } => "upstream_http",
            GatewayError::UpstreamTransport { .. } => "upstream_transport",
            GatewayError::NotFoundRoute { .. } => "not_found",
            GatewayError::Unhandled => "unhandled",
        }
    }
}

/// Map an upstream failure to the error surfaced to the caller.
///
/// A structured upstream response keeps its status and body; everything
/// else becomes a 500 carrying the raw error message.
pub fn classify_upstream_failure(error: UpstreamError, provider: &'static str) -> GatewayError {
    match error {
        UpstreamError::Status { status, body } => GatewayError::UpstreamHttp {
            provider,
            status,
            body,
        },
        other => GatewayError::UpstreamTransport {
            provider,
            message: other.to_string(),
        },
    }
}
