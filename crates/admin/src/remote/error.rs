//! Remote adapter errors.

use thiserror::Error;

/// Errors a remote call can fail with.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Request failed: {0}")]
    Request(String),

    /// The response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Response(String),

    /// The backend has no record with this id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the payload (400/409/422).
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Missing or invalid credentials (401/403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// No backend is attached to this store.
    #[error("No remote backend configured")]
    Offline,
}

impl RemoteError {
    /// Short message suitable for a notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(_) => "Could not reach the server".to_string(),
            Self::Response(_) | Self::Api { .. } => "The server returned an error".to_string(),
            Self::NotFound(_) => "The record no longer exists".to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Unauthorized(_) => "You are not allowed to do this".to_string(),
            Self::Offline => "No server is configured".to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Response(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}
