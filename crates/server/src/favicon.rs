//! Upstream favicon proxy.

use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

/// Content type of every proxied favicon.
pub const FAVICON_CONTENT_TYPE: &str = "image/x-icon";

/// Upstream request timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure to fetch the upstream favicon.
#[derive(Debug, Error)]
pub enum FaviconError {
    #[error("favicon request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("favicon upstream returned status {0}")]
    Status(u16),
}

/// Build the shared HTTP client used for upstream requests.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(concat!("dirindex/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetch the favicon bytes from `url`.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<Bytes, FaviconError> {
    debug!("Fetching favicon from {}", url);

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FaviconError::Status(status.as_u16()));
    }

    Ok(response.bytes().await?)
}
