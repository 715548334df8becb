//! Attachment client: lists and downloads files attached to a model.

use crate::config::RepositoryConfig;
use crate::error::ApiError;
use crate::repository::fetch::build_http_client;
use crate::repository::urls::RepositoryUrls;
use crate::types::ModelCoordinate;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tag id the repository puts on a file imported from another format.
pub const IMPORTED_TAG_ID: &str = "org.eclipse.vorto.tag.import";
pub const IMPORTED_TAG_LABEL: &str = "Imported";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

impl Tag {
    pub fn is_imported(&self) -> bool {
        self.id == IMPORTED_TAG_ID || self.label == IMPORTED_TAG_LABEL
    }
}

/// Attachment metadata as listed by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Attachment {
    pub fn is_imported(&self) -> bool {
        self.tags.iter().any(Tag::is_imported)
    }
}

#[async_trait]
pub trait AttachmentClient: Send + Sync {
    async fn list_attachments(&self, id: &ModelCoordinate) -> Result<Vec<Attachment>, ApiError>;

    async fn download_attachment(
        &self,
        id: &ModelCoordinate,
        filename: &str,
    ) -> Result<Vec<u8>, ApiError>;
}

/// Attachment client talking to the repository with the runner's own
/// credentials (basic auth), independent of any caller header.
#[derive(Debug, Clone)]
pub struct HttpAttachmentClient {
    client: Client,
    urls: RepositoryUrls,
    username: Option<String>,
    password: Option<String>,
}

impl HttpAttachmentClient {
    pub fn new(config: &RepositoryConfig) -> Result<Self, ApiError> {
        Ok(Self::with_client(build_http_client(config)?, config))
    }

    pub fn with_client(client: Client, config: &RepositoryConfig) -> Self {
        Self {
            client,
            urls: RepositoryUrls::new(config.base_url.clone()),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_ref()),
            None => request,
        }
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response, ApiError> {
        debug!(url = %url, "Requesting attachment resource");
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RepositoryRequestFailed(format!("{}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(ApiError::RepositoryRequestFailed(format!(
                "{}: status {}",
                url,
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl AttachmentClient for HttpAttachmentClient {
    async fn list_attachments(&self, id: &ModelCoordinate) -> Result<Vec<Attachment>, ApiError> {
        let url = self.urls.attachments(id);
        self.send(&url)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::RepositoryRequestFailed(format!("{}: {}", url, e)))
    }

    async fn download_attachment(
        &self,
        id: &ModelCoordinate,
        filename: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.urls.attachment_file(id, filename);
        let body = self
            .send(&url)
            .await?
            .bytes()
            .await
            .map_err(|e| ApiError::RepositoryRequestFailed(format!("{}: {}", url, e)))?;
        Ok(body.to_vec())
    }
}
