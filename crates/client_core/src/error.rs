use reqwest::StatusCode;
use thiserror::Error;

/// Fixed text shown when a failure carries no usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Server error!";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("server rejected request with {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid service url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

impl ServiceError {
    /// The server-reported message, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ServiceError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text for the flash message area.
    pub fn flash_text(&self) -> String {
        self.server_message()
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}
