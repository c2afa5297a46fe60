use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error object reported by the promotions service.
///
/// Only `message` is guaranteed; the service adds `status` and `error` on some
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            error: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bare_message_body() {
        let err: ApiError =
            serde_json::from_str(r#"{"message": "Promotion with id '9' was not found."}"#)
                .expect("decode");
        assert_eq!(err, ApiError::new("Promotion with id '9' was not found."));
        assert_eq!(err.to_string(), "Promotion with id '9' was not found.");
    }

    #[test]
    fn decodes_full_error_body() {
        let err: ApiError = serde_json::from_str(
            r#"{"status": 415, "error": "Unsupported media type", "message": "Content-Type must be application/json"}"#,
        )
        .expect("decode");
        assert_eq!(err.status, Some(415));
        assert_eq!(err.message, "Content-Type must be application/json");
    }
}
