//! Error types for the resource fetcher.

/// Fetch errors. All are terminal for the call that produced them; the
/// client never retries.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The host URL did not parse.
    #[error("invalid host url '{url}': {reason}")]
    InvalidHost { url: String, reason: String },

    /// Client construction failed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The server answered with something other than 200 OK.
    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    /// The response declared a non-text content type.
    #[error("unexpected content type '{content_type}' for {url}")]
    ContentType { url: String, content_type: String },

    /// The response body exceeds the configured size cap.
    #[error("response body too large: {size} bytes exceeds cap of {limit}")]
    TooLarge { size: usize, limit: usize },

    /// Transport-level failure (connect, TLS, timeout, read).
    #[error("network error: {message}")]
    Network { message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
