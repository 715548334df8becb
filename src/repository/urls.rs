//! Canonical repository download URLs.

use crate::types::ModelCoordinate;
use reqwest::Url;

/// Builds repository URLs from a base URL and model coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrls {
    base_url: String,
}

impl RepositoryUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Model bundle including its dependency closure.
    pub fn model_bundle(&self, id: &ModelCoordinate) -> String {
        format!(
            "{}/api/v1/models/{}/file?includeDependencies=true",
            self.base_url,
            id.pretty_format()
        )
    }

    /// Mapping bundle of `id` for one generator key.
    pub fn mapping_bundle(&self, generator_key: &str, id: &ModelCoordinate) -> String {
        format!(
            "{}/rest/models/{}/download/mappings/{}",
            self.base_url,
            id.pretty_format(),
            generator_key
        )
    }

    /// Attachment metadata listing for a model.
    pub fn attachments(&self, id: &ModelCoordinate) -> String {
        format!("{}/api/v1/attachments/{}", self.base_url, id.pretty_format())
    }

    /// Download URL of one attachment; the filename is percent-encoded.
    pub fn attachment_file(&self, id: &ModelCoordinate, filename: &str) -> String {
        let listing = format!("{}/files", self.attachments(id));
        match Url::parse(&listing) {
            Ok(mut url) => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.push(filename);
                }
                url.to_string()
            }
            Err(_) => format!("{}/{}", listing, filename),
        }
    }
}
