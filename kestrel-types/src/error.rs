//! Error types for kestrel connectors.

/// Errors from completion service operations.
///
/// Connectors never retry internally; `is_retryable` exists so the
/// calling orchestration layer can decide for itself.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A line of a streaming response body was not a valid chunk
    /// (invalid JSON, invalid UTF-8, or missing required fields).
    #[error("decode error: {0}")]
    Decode(String),

    /// The service returned a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpOperation {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// Network-level error (connection reset, DNS failure, etc.).
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out. The deadline is whatever the caller
    /// configured on the HTTP client, so no duration is carried here.
    #[error("request timed out")]
    Timeout,
}

impl ServiceError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::HttpOperation { status, .. } => (500..=599).contains(status),
            Self::Decode(_) => false,
        }
    }
}
