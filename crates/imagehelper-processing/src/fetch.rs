//! Remote image download
//!
//! The fetch is the only suspension point of a pipeline call. Dropping the
//! returned future aborts the in-flight request.

use async_trait::async_trait;
use bytes::Bytes;
use imagehelper_core::{ImagingConfig, ImagingError};

/// Retrieves the full body of a remote resource
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, ImagingError>;
}

/// `Fetcher` backed by a shared `reqwest::Client`. No retries.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &ImagingConfig) -> Result<Self, ImagingError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.http_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ImagingError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ImagingError> {
        let parsed_url = reqwest::Url::parse(url)
            .map_err(|e| ImagingError::remote_fetch(url, None, format!("invalid URL: {}", e)))?;

        if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
            return Err(ImagingError::remote_fetch(
                url,
                None,
                "only HTTP and HTTPS URLs are allowed",
            ));
        }

        tracing::debug!(url = %url, "Downloading image");

        let response = self.client.get(parsed_url).send().await.map_err(|e| {
            ImagingError::remote_fetch(url, None, format!("request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImagingError::remote_fetch(
                url,
                Some(status.as_u16()),
                format!("URL returned status code: {}", status),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            ImagingError::remote_fetch(
                url,
                Some(status.as_u16()),
                format!("failed to read response body: {}", e),
            )
        })?;

        tracing::debug!(url = %url, size_bytes = body.len(), "Downloaded image");

        Ok(body)
    }
}
