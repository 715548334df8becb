//! Mapping resolution: platform-specific mapping rules for a model.

use crate::model::{MappingRule, ModelWorkspace};
use crate::repository::{RemoteFetcher, RepositoryUrls};
use crate::types::ModelCoordinate;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct MappingResolver {
    fetcher: Arc<dyn RemoteFetcher>,
    urls: RepositoryUrls,
}

impl MappingResolver {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, urls: RepositoryUrls) -> Self {
        Self { fetcher, urls }
    }

    /// Mapping rules of `id` for `generator_key`, in bundle order.
    ///
    /// Never fails: a missing or unreadable bundle yields no rules.
    pub async fn resolve(
        &self,
        generator_key: &str,
        id: &ModelCoordinate,
        authorization: Option<&str>,
    ) -> Vec<MappingRule> {
        let url = self.urls.mapping_bundle(generator_key, id);
        let Some(bundle) = self.fetcher.fetch(&url, authorization).await else {
            debug!(model = %id, generator = %generator_key, "No mapping bundle");
            return Vec::new();
        };

        match ModelWorkspace::from_zip(&bundle) {
            Ok(workspace) => workspace.into_mappings(),
            Err(e) => {
                warn!(
                    model = %id,
                    generator = %generator_key,
                    error = %e,
                    "Ignoring unreadable mapping bundle"
                );
                Vec::new()
            }
        }
    }
}
