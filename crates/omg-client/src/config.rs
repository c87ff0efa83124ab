//! Client configuration.

use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default hard cap on response body size. Resources are small text files;
/// anything near this size is hostile or broken.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// User agent sent with every request.
pub const USER_AGENT_VALUE: &str = concat!("omg-client/", env!("CARGO_PKG_VERSION"));

/// Fetcher configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout, enforced by the HTTP client.
    pub timeout: Duration,

    /// Hard cap on response body size; larger bodies are rejected while
    /// streaming, before they are buffered whole.
    pub max_body_bytes: usize,

    /// User agent header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the response size cap.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
