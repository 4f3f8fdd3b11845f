//! AWS error type mirroring the official AWS SDK error model.
//!
//! ECS answers failures with a JSON body and an HTTP status; this module turns
//! those, and transport-level `reqwest` failures, into one [`AwsError`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code given to failures to resolve the endpoint host.
pub const NAME_RESOLUTION_FAILURE: &str = "NameResolutionFailure";

/// Top-level error type for all AWS operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsError {
    /// The AWS error code (e.g., "ClusterNotFoundException", "AccessDeniedException").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status code, or 0 when no response was received.
    pub status_code: u16,
    /// AWS request ID for tracing (returned in response headers).
    pub request_id: Option<String>,
    /// The AWS service that returned the error (e.g., "ecs").
    pub service: String,
    /// The specific API action that failed.
    pub action: Option<String>,
}

impl fmt::Display for AwsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AWS {} error [{}]: {}", self.service, self.code, self.message)?;
        if self.status_code != 0 {
            write!(f, " (HTTP {})", self.status_code)?;
        }
        if let Some(ref action) = self.action {
            write!(f, " [Action: {}]", action)?;
        }
        if let Some(ref req_id) = self.request_id {
            write!(f, " [RequestId: {}]", req_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for AwsError {}

impl AwsError {
    pub fn new(service: &str, code: &str, message: &str, status_code: u16) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            status_code,
            request_id: None,
            service: service.to_string(),
            action: None,
        }
    }

    /// Build a credential error.
    pub fn credential_error(message: &str) -> Self {
        Self::new("ecs", "CredentialError", message, 0)
    }

    /// Build a validation error for local configuration problems.
    pub fn validation(service: &str, message: &str) -> Self {
        Self::new(service, "ValidationError", message, 0)
    }

    pub fn with_request_id(mut self, id: String) -> Self {
        self.request_id = Some(id);
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn is_name_resolution(&self) -> bool {
        self.code == NAME_RESOLUTION_FAILURE
    }

    /// Parse an AWS JSON error response.
    ///
    /// AWS JSON error format:
    /// ```json
    /// {
    ///   "__type": "ClusterNotFoundException",
    ///   "message": "Cluster not found."
    /// }
    /// ```
    pub fn parse_json_error(service: &str, status_code: u16, body: &str) -> Self {
        if let Ok(val) = serde_json::from_str::<serde_json::Value>(body) {
            let code = val
                .get("__type")
                .or_else(|| val.get("code"))
                .or_else(|| val.get("Code"))
                .and_then(|v| v.as_str())
                // __type can be "com.amazonaws.ecs#ClusterNotFoundException"
                .map(|s| s.rsplit('#').next().unwrap_or(s).to_string())
                .unwrap_or_else(|| "UnknownError".to_string());
            let message = val
                .get("message")
                .or_else(|| val.get("Message"))
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error")
                .to_string();
            Self::new(service, &code, &message, status_code)
        } else {
            let snippet: String = body.chars().take(200).collect();
            Self::new(
                service,
                "ParseError",
                &format!("Failed to parse error response: {}", snippet),
                status_code,
            )
        }
    }
}

impl From<reqwest::Error> for AwsError {
    fn from(err: reqwest::Error) -> Self {
        let code = if is_name_resolution(&err) {
            NAME_RESOLUTION_FAILURE
        } else if err.is_timeout() {
            "RequestTimeout"
        } else {
            "HttpError"
        };
        Self {
            code: code.to_string(),
            message: error_chain(&err),
            status_code: err.status().map(|s| s.as_u16()).unwrap_or(0),
            request_id: None,
            service: "http".to_string(),
            action: None,
        }
    }
}

/// Whether a connect failure was caused by the resolver rather than the peer.
fn is_name_resolution(err: &reqwest::Error) -> bool {
    err.is_connect() && mentions_resolver_failure(&error_chain(err))
}

fn mentions_resolver_failure(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    [
        "dns error",
        "failed to lookup address",
        "name or service not known",
        "no such host",
        "nodename nor servname",
        "temporary failure in name resolution",
    ]
    .iter()
    .any(|needle| lower.contains(needle))
}

/// Join an error and its sources into one line.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = inner.source();
    }
    parts.join(": ")
}

/// Convenience result type for AWS operations.
pub type AwsResult<T> = Result<T, AwsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AwsError::new("ecs", "ClusterNotFoundException", "Cluster not found.", 400);
        let s = err.to_string();
        assert!(s.contains("ecs"));
        assert!(s.contains("ClusterNotFoundException"));
        assert!(s.contains("HTTP 400"));
    }

    #[test]
    fn error_display_with_request_id_and_action() {
        let err = AwsError::new("ecs", "AccessDeniedException", "denied", 400)
            .with_request_id("req-abc-123".into())
            .with_action("CreateService");
        let s = err.to_string();
        assert!(s.contains("req-abc-123"));
        assert!(s.contains("CreateService"));
    }

    #[test]
    fn credential_errors_belong_to_ecs() {
        let err = AwsError::credential_error("No credentials found");
        assert_eq!(err.service, "ecs");
        assert_eq!(err.code, "CredentialError");
    }

    #[test]
    fn local_errors_omit_status() {
        let err = AwsError::validation("ecs", "No region specified");
        assert!(!err.to_string().contains("HTTP"));
    }

    #[test]
    fn parse_json_error_namespaced_type() {
        let json = r#"{"__type":"com.amazonaws.ecs#ServiceNotFoundException","message":"Service not found."}"#;
        let err = AwsError::parse_json_error("ecs", 400, json);
        assert_eq!(err.code, "ServiceNotFoundException");
        assert_eq!(err.message, "Service not found.");
    }

    #[test]
    fn parse_json_error_garbage_body() {
        let err = AwsError::parse_json_error("ecs", 502, "<html>bad gateway</html>");
        assert_eq!(err.code, "ParseError");
        assert_eq!(err.status_code, 502);
    }

    #[test]
    fn resolver_failures_are_recognised() {
        assert!(mentions_resolver_failure(
            "error sending request: client error (Connect): dns error: failed to lookup address information"
        ));
        assert!(mentions_resolver_failure("No such host is known. (os error 11001)"));
        assert!(!mentions_resolver_failure("connection refused"));
    }

    #[test]
    fn serde_roundtrip() {
        let err = AwsError::new("ecs", "InvalidParameterException", "bad", 400)
            .with_request_id("r-123".into())
            .with_action("RunTask");
        let json = serde_json::to_string(&err).unwrap();
        let back: AwsError = serde_json::from_str(&json).unwrap();
        assert_eq!(back.code, "InvalidParameterException");
        assert_eq!(back.action.as_deref(), Some("RunTask"));
        assert_eq!(back.request_id.as_deref(), Some("r-123"));
    }
}
