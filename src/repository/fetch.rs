//! Remote fetcher: raw HTTP downloads that report failure as absence.

use crate::config::RepositoryConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use tracing::{debug, warn};

/// Downloads raw bytes. Never fails past its boundary: transport errors,
/// timeouts, non-2xx responses and empty bodies all yield `None`.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// GET `url`, passing `authorization` through verbatim when present.
    async fn fetch(&self, url: &str, authorization: Option<&str>) -> Option<Vec<u8>>;
}

/// Build the shared HTTP client with the configured timeouts.
pub fn build_http_client(config: &RepositoryConfig) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| ApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

/// `reqwest`-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &RepositoryConfig) -> Result<Self, ApiError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, authorization: Option<&str>) -> Option<Vec<u8>> {
        debug!(url = %url, "Downloading");

        let mut request = self.client.get(url);
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, timeout = e.is_timeout(), "Error downloading the URL");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Download returned non-success status");
            return None;
        }

        match response.bytes().await {
            Ok(body) if body.is_empty() => {
                warn!(url = %url, "Download returned an empty body");
                None
            }
            Ok(body) => Some(body.to_vec()),
            Err(e) => {
                warn!(url = %url, error = %e, "Error reading download body");
                None
            }
        }
    }
}
