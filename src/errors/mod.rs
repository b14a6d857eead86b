//! Error handling module for the dashboard client.
//!
//! Provides one error type for every failure a view or workflow can surface,
//! plus decoding of the backend's `{"error": "..."}` bodies.

use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const MISSING_SESSION: &str = "MISSING_SESSION";
    pub const MISSING_CONTEXT: &str = "MISSING_CONTEXT";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const RESOLUTION_FAILED: &str = "RESOLUTION_FAILED";
    pub const POSTED_NOT_DISPLAYED: &str = "POSTED_NOT_DISPLAYED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
}

/// Client error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// No session identifier is present
    MissingSession,
    /// A view was entered without the entity it needs
    MissingContext(String),
    /// Input rejected before reaching the backend
    Validation(String),
    /// The current principal may not perform the action
    Forbidden(String),
    /// The request never produced a response
    Transport(String),
    /// The backend answered with a non-success status
    Api { status: u16, message: String },
    /// The response body did not have the expected shape
    Decode(String),
    /// The session identifier could not be resolved to a principal
    ResolutionFailed(String),
    /// The comment was stored but its sender name could not be resolved
    PostedNotDisplayed { comment_id: String, message: String },
    /// Session file could not be read or written
    Storage(String),
}

impl ClientError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::MissingSession => codes::MISSING_SESSION,
            ClientError::MissingContext(_) => codes::MISSING_CONTEXT,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Forbidden(_) => codes::FORBIDDEN,
            ClientError::Transport(_) => codes::TRANSPORT_ERROR,
            ClientError::Api { .. } => codes::API_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::ResolutionFailed(_) => codes::RESOLUTION_FAILED,
            ClientError::PostedNotDisplayed { .. } => codes::POSTED_NOT_DISPLAYED,
            ClientError::Storage(_) => codes::STORAGE_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::MissingSession => "No active session. Please log in.".to_string(),
            ClientError::MissingContext(msg) => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Forbidden(msg) => msg.clone(),
            ClientError::Transport(msg) => msg.clone(),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::ResolutionFailed(msg) => msg.clone(),
            ClientError::PostedNotDisplayed { message, .. } => message.clone(),
            ClientError::Storage(msg) => msg.clone(),
        }
    }

    /// Whether this error happened before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::MissingSession
                | ClientError::MissingContext(_)
                | ClientError::Validation(_)
                | ClientError::Forbidden(_)
        )
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::warn!("Response decode error: {:?}", err);
            return ClientError::Decode(format!("Unexpected response: {}", err));
        }
        tracing::warn!("Transport error: {:?}", err);
        ClientError::Transport(format!("Request failed: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Session storage error: {:?}", err);
        ClientError::Storage(format!("Session storage error: {}", err))
    }
}

/// Error body returned by the backend on non-success responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Extract the backend message from a raw body, falling back to the body itself.
    pub fn message_from(raw: &str, fallback: &str) -> String {
        match serde_json::from_str::<ErrorBody>(raw) {
            Ok(body) => body.error,
            Err(_) if raw.trim().is_empty() => fallback.to_string(),
            Err(_) => raw.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error":"User not found"}"#, "fallback"),
            "User not found"
        );
        assert_eq!(ErrorBody::message_from("", "fallback"), "fallback");
        assert_eq!(ErrorBody::message_from("boom\n", "fallback"), "boom");
    }

    #[test]
    fn test_display_includes_code() {
        let err = ClientError::Api {
            status: 404,
            message: "Project not found".to_string(),
        };
        assert_eq!(err.to_string(), "API_ERROR: Project not found");
    }

    #[test]
    fn test_local_errors() {
        assert!(ClientError::MissingSession.is_local());
        assert!(ClientError::Validation("empty".into()).is_local());
        assert!(!ClientError::Transport("down".into()).is_local());
        assert!(!ClientError::PostedNotDisplayed {
            comment_id: "1".into(),
            message: "x".into()
        }
        .is_local());
    }
}
