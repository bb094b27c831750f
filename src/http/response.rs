//! Response envelope.
//!
//! Every gateway route answers with the same JSON shape:
//! `{ uid, data?, error?, details?, cached?, success }`. Optional fields are
//! omitted when absent; `cached` only appears on a cache hit.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::{GatewayError, Lookup};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Caller-supplied client/session identifier, echoed uninterpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,

    pub success: bool,
}

impl Envelope {
    pub fn success(uid: String, lookup: Lookup) -> Self {
        Self {
            uid: Some(uid),
            data: Some(lookup.data),
            error: None,
            details: None,
            cached: lookup.cached.then_some(true),
            success: true,
        }
    }

    pub fn failure(uid: Option<String>, error: &GatewayError) -> Self {
        Self {
            uid,
            data: None,
            error: Some(error.to_string()),
            details: error.details(),
            cached: None,
            success: false,
        }
    }

    /// Failure without a uid or details.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            uid: None,
            data: None,
            error: Some(error.into()),
            details: None,
            cached: None,
            success: false,
        }
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        Envelope::failure(None, &self).into_response_with(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::IdentifierError;
    use serde_json::json;

    #[test]
    fn test_fresh_success_omits_cached() {
        let envelope = Envelope::success(
            "u1".to_string(),
            Lookup {
                data: json!({"name": "Shelly"}),
                cached: false,
            },
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"uid": "u1", "data": {"name": "Shelly"}, "success": true})
        );
    }

    #[test]
    fn test_cache_hit_sets_cached() {
        let envelope = Envelope::success(
            "u1".to_string(),
            Lookup {
                data: json!(1),
                cached: true,
            },
        );
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["cached"], json!(true));
    }

    #[test]
    fn test_failure_shape() {
        let err = GatewayError::from(IdentifierError::Tag);
        let value = serde_json::to_value(Envelope::failure(Some("u2".to_string()), &err)).unwrap();
        assert_eq!(
            value,
            json!({"uid": "u2", "error": "Invalid tag", "success": false})
        );
    }

    #[test]
    fn test_upstream_failure_carries_details() {
        let err = GatewayError::UpstreamHttp {
            provider: "Brawl Stars",
            status: 403,
            body: json!({"reason": "accessDenied"}),
        };
        let value = serde_json::to_value(Envelope::failure(Some("u3".to_string()), &err)).unwrap();
        assert_eq!(value["error"], "Brawl Stars error: 403");
        assert_eq!(value["details"], json!({"reason": "accessDenied"}));
    }

    #[test]
    fn test_error_into_response_status() {
        let response = GatewayError::Unhandled.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
