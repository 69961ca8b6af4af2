//! Client error types.

/// Errors that can occur when talking to the registration backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the backend, if any.
        message: Option<String>,
    },

    /// The setup intent response carried no client secret.
    #[error("client secret not returned from backend")]
    MissingClientSecret,

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// The backend-reported message, if this error carries one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
