//! Model resolution: fetch the model bundle and link the requested root.

use crate::error::ApiError;
use crate::model::{ModelContent, ModelWorkspace, ResolvedModel};
use crate::repository::{RemoteFetcher, RepositoryUrls};
use crate::types::ModelCoordinate;
use std::sync::Arc;
use tracing::debug;

pub struct ModelResolver {
    fetcher: Arc<dyn RemoteFetcher>,
    urls: RepositoryUrls,
}

impl ModelResolver {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, urls: RepositoryUrls) -> Self {
        Self { fetcher, urls }
    }

    /// Fetch and flatten the model at `id`.
    ///
    /// `Ok(None)` when the repository yields nothing for the coordinate; the
    /// caller decides that this is a not-found. A bundle that lacks the
    /// requested model is reported as not found directly. Unreadable bundles
    /// and unlinkable models are errors.
    pub async fn resolve(
        &self,
        id: &ModelCoordinate,
        authorization: Option<&str>,
    ) -> Result<Option<ResolvedModel>, ApiError> {
        let url = self.urls.model_bundle(id);
        let Some(bundle) = self.fetcher.fetch(&url, authorization).await else {
            return Ok(None);
        };

        let workspace = ModelWorkspace::from_zip(&bundle)?;
        debug!(model = %id, documents = workspace.models().len(), "Unpacked model bundle");

        let root = workspace
            .find(id)
            .or_else(|| workspace.find_by_name(id.name()))
            .ok_or_else(|| ApiError::ModelNotFound(id.clone()))?;
        ResolvedModel::flatten(&workspace, root).map(Some)
    }

    /// Convert caller-supplied content; no network access.
    pub fn resolve_content(&self, content: &ModelContent) -> Result<ResolvedModel, ApiError> {
        content.to_resolved()
    }
}
