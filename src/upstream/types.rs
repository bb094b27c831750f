//! Upstream error definitions.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling an upstream game API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}")]
    Status { status: u16, body: Value },

    /// Upstream did not answer within the provider timeout.
    #[error("upstream timeout after {0} ms")]
    Timeout(u64),

    /// Connection, TLS or protocol failure.
    #[error("{0}")]
    Transport(String),

    /// Upstream answered 2xx but the payload was unusable.
    #[error("invalid upstream payload: {0}")]
    Decode(String),

    /// Provider base URL could not be parsed or extended.
    #[error("invalid upstream URL '{0}'")]
    InvalidUrl(String),

    /// Credential cannot be carried in an HTTP header.
    #[error("invalid credential for {0}")]
    InvalidCredential(&'static str),
}

impl UpstreamError {
    /// Upstream HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Timeout(10_000);
        assert_eq!(err.to_string(), "upstream timeout after 10000 ms");

        let err = UpstreamError::Status {
            status: 403,
            body: Value::Null,
        };
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("403"));
    }
}
