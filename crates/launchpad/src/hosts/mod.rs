//! Adapters for the public hosts the launch publishes to
//!
//! Each host exposes a single capability, publishing some bytes and handing
//! back a URL that resolves to them. The orchestration only depends on the
//! traits, so hosts can be swapped without touching it.

pub mod gist;
pub mod imgbb;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterError;

pub use gist::GistHost;
pub use imgbb::ImgBbHost;

/// Publishes raw image bytes
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Host name for logging
    fn name(&self) -> &'static str;

    /// Upload `image` and return a publicly fetchable URL
    async fn upload(&self, image: &[u8]) -> Result<String, AdapterError>;
}

/// Publishes a text document
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Host name for logging
    fn name(&self) -> &'static str;

    /// Publish `content` under `file_name` and return a URL serving the raw content
    async fn publish(&self, file_name: &str, content: &str) -> Result<String, AdapterError>;
}

/// Build the shared HTTP client used by the hosts
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, AdapterError> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("launchpad/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Turn a non-success response into [`AdapterError::Status`]
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(AdapterError::Status {
        status: status.as_u16(),
        body,
    })
}
