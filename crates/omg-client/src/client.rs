//! HTTP fetcher for the three well-known OMG resources.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use tracing::{debug, warn};
use url::Url;

use omg_core::{Canary, Mirrors};

use crate::config::ClientConfig;
use crate::error::{FetchError, FetchResult};

/// Resource name for the mirror list.
pub const MIRRORS_RESOURCE: &str = "mirrors.txt";
/// Resource name for the warrant canary.
pub const CANARY_RESOURCE: &str = "canary.txt";
/// Resource name for the related-services list.
pub const RELATED_RESOURCE: &str = "related.txt";

/// Fetches OMG resources from a host and wraps them as typed messages.
///
/// The client only moves bytes: it enforces the transport contract (status,
/// content type, size cap, timeout) and hands everything else to the
/// message types in `omg-core`. No retries, no caching.
#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let mut default_headers = HeaderMap::new();
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|e| FetchError::Config {
                message: format!("invalid user agent: {e}"),
            })?;
        default_headers.insert(USER_AGENT, user_agent);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| FetchError::Config {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    /// Download `mirrors.txt` from a host.
    pub async fn mirrors(&self, host: &str) -> FetchResult<Mirrors> {
        Ok(Mirrors::from(self.fetch(host, MIRRORS_RESOURCE).await?))
    }

    /// Download `canary.txt` from a host.
    pub async fn canary(&self, host: &str) -> FetchResult<Canary> {
        Ok(Canary::from(self.fetch(host, CANARY_RESOURCE).await?))
    }

    /// Download `related.txt` from a host. Related services share the
    /// mirror-list message shape.
    pub async fn related(&self, host: &str) -> FetchResult<Mirrors> {
        Ok(Mirrors::from(self.fetch(host, RELATED_RESOURCE).await?))
    }

    /// Fetch one resource, enforcing the transport contract. Only a 200
    /// response with a text content type and a body under the cap passes
    /// through as bytes.
    async fn fetch(&self, host: &str, resource: &str) -> FetchResult<Vec<u8>> {
        let url = resource_url(host, resource)?;
        debug!(url = %url, "fetching resource");

        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(url = %url, status = %status, "unexpected response status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response.headers().get(CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or_default();
            if !is_text(content_type) {
                warn!(url = %url, content_type = %content_type, "unexpected content type");
                return Err(FetchError::ContentType {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        // Reject oversized bodies while streaming rather than trusting
        // Content-Length; a hostile server may lie or omit it.
        let limit = self.config.max_body_bytes;
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                warn!(url = %url, limit, "response body exceeds size cap");
                return Err(FetchError::TooLarge {
                    size: body.len() + chunk.len(),
                    limit,
                });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), "fetched resource");
        Ok(body)
    }
}

/// Join a fixed resource name onto the host URL's existing path component.
fn resource_url(host: &str, resource: &str) -> FetchResult<Url> {
    let mut url = Url::parse(host).map_err(|e| FetchError::InvalidHost {
        url: host.to_string(),
        reason: e.to_string(),
    })?;
    let path = format!("{}/{}", url.path().trim_end_matches('/'), resource);
    url.set_path(&path);
    Ok(url)
}

/// Accept `text/*` media types; an absent header is tolerated.
fn is_text(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .starts_with("text/")
}
