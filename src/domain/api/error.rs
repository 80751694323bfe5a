//! The single error type surfaced by admin API calls.
//!
//! Every failure of the authenticated client, from a missing session to a
//! backend 5xx, arrives at the caller as an [`ApiError`]. Nothing is retried.

use serde_json::Value;
use thiserror::Error;

/// Coarse classification of an [`ApiError`] for views deciding what to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// No session, or the backend rejected the credential (401).
    Unauthenticated,
    /// Signed in but not allowed (403).
    Forbidden,
    /// Resource does not exist (404).
    NotFound,
    /// Any other 4xx.
    ClientError,
    /// 5xx.
    ServerError,
    /// No usable HTTP status: configuration, transport or decoding problems.
    Local,
}

impl StatusClass {
    /// Classifies an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => StatusClass::Unauthenticated,
            403 => StatusClass::Forbidden,
            404 => StatusClass::NotFound,
            400..=499 => StatusClass::ClientError,
            500..=599 => StatusClass::ServerError,
            _ => StatusClass::Local,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No principal, or a bearer credential could not be obtained.
    #[error("{message}")]
    Unauthenticated { message: String },

    /// No backend base URL resolvable for the selected environment.
    #[error("{0}")]
    Configuration(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Transport(String),

    /// A success response did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Sign-in or sign-out was rejected by the identity provider.
    #[error("{0}")]
    IdentityProvider(String),
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration(message.into())
    }

    /// Builds an HTTP error from a status and a parsed error body.
    ///
    /// The message is the body's `message` field, then its `error` field,
    /// then `API error: <status>`.
    pub fn from_response(status: u16, body: Value) -> Self {
        let message = ["message", "error"]
            .iter()
            .filter_map(|key| body.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("API error: {}", status));

        ApiError::Http {
            status,
            message,
            body: Some(body),
        }
    }

    /// Numeric status: the HTTP status, 401 for unauthenticated, 0 otherwise.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthenticated { .. } => 401,
            ApiError::Http { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn status_class(&self) -> StatusClass {
        StatusClass::from_status(self.status())
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Raw error body returned by the backend, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_class() == StatusClass::NotFound
    }

    /// True when the session should be considered gone.
    pub fn requires_reauthentication(&self) -> bool {
        self.status_class() == StatusClass::Unauthenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_field_wins() {
        let err = ApiError::from_response(404, json!({"message": "not found", "error": "x"}));
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "not found");
        assert!(err.is_not_found());
        assert_eq!(err.body(), Some(&json!({"message": "not found", "error": "x"})));
    }

    #[test]
    fn error_field_is_second_choice() {
        let err = ApiError::from_response(400, json!({"error": "bad input"}));
        assert_eq!(err.message(), "bad input");
        assert_eq!(err.status_class(), StatusClass::ClientError);
    }

    #[test]
    fn synthesizes_message_when_body_has_none() {
        let err = ApiError::from_response(500, json!({}));
        assert_eq!(err.message(), "API error: 500");
        assert_eq!(err.status_class(), StatusClass::ServerError);
    }

    #[test]
    fn non_string_message_is_ignored() {
        let err = ApiError::from_response(502, json!({"message": {"nested": true}}));
        assert_eq!(err.message(), "API error: 502");
    }

    #[test]
    fn unauthenticated_reports_401() {
        let err = ApiError::unauthenticated("Not authenticated");
        assert_eq!(err.status(), 401);
        assert!(err.requires_reauthentication());
        assert_eq!(err.to_string(), "Not authenticated");
    }

    #[test]
    fn local_errors_have_no_status() {
        assert_eq!(ApiError::configuration("no url").status_class(), StatusClass::Local);
        assert_eq!(ApiError::Transport("refused".into()).status(), 0);
        assert!(ApiError::Decode("eof".into()).body().is_none());
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(StatusClass::from_status(403), StatusClass::Forbidden);
        assert_eq!(StatusClass::from_status(429), StatusClass::ClientError);
        assert_eq!(StatusClass::from_status(503), StatusClass::ServerError);
        assert_eq!(StatusClass::from_status(302), StatusClass::Local);
    }
}
