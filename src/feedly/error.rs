use std::time::Duration;
use thiserror::Error;

/// Errors returned by the feedly client and its transport.
///
/// Nothing here is retried by the client: retry policy belongs to whoever
/// owns the [`Transport`](super::Transport).
#[derive(Debug, Error)]
pub enum FeedlyError {
    /// The caller passed an empty identifier or an empty batch.
    /// Raised before any request is made.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// HTTP response with non-2xx status code
    #[error("HTTP error fetching {url}: status {status}")]
    HttpStatus { status: u16, url: String },
    /// Response body did not match the expected shape
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// Request body could not be serialized
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Insecure base URL: HTTPS required (except localhost for testing)")]
    InsecureBaseUrl,
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

