//! Generation pipeline.
//!
//! Every request moves through the same steps. First the generator key is
//! looked up, with no network access. Then the model is resolved, and for
//! stored models the mapping rules and the imported attachment are resolved
//! alongside it. Finally the plugin is invoked behind the invoker's recovery
//! boundary. Only an unknown generator, an unresolvable model, or invalid
//! input reach the caller as errors. Everything after that point yields an
//! artifact.

use crate::config::GeneratorConfig;
use crate::error::ApiError;
use crate::generator::{
    GeneratedArtifact, Generator, GeneratorInvoker, GeneratorRegistry, InvocationContext,
};
use crate::model::{ModelContent, ResolvedModel};
use crate::repository::{
    build_http_client, AttachmentClient, HttpAttachmentClient, HttpFetcher, RemoteFetcher,
    RepositoryUrls,
};
use crate::resolve::{AttachmentResolver, MappingResolver, ModelResolver};
use crate::types::ModelCoordinate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One generation request, by where its model comes from.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    /// Model stored in the repository.
    Coordinates {
        generator_key: String,
        id: ModelCoordinate,
        parameters: HashMap<String, String>,
        /// Passed through verbatim to the model and mapping downloads.
        authorization: Option<String>,
    },
    /// Model content supplied by the caller.
    Inline {
        generator_key: String,
        content: ModelContent,
        parameters: HashMap<String, String>,
    },
    /// Parameter-only generation without a model.
    Template {
        generator_key: String,
        parameters: HashMap<String, String>,
    },
}

impl GenerationRequest {
    pub fn generator_key(&self) -> &str {
        match self {
            GenerationRequest::Coordinates { generator_key, .. }
            | GenerationRequest::Inline { generator_key, .. }
            | GenerationRequest::Template { generator_key, .. } => generator_key,
        }
    }
}

pub struct GenerationService {
    registry: Arc<GeneratorRegistry>,
    models: ModelResolver,
    mappings: MappingResolver,
    attachments: AttachmentResolver,
}

impl GenerationService {
    /// Service talking to the repository configured in `config`.
    pub fn from_config(
        config: &GeneratorConfig,
        registry: Arc<GeneratorRegistry>,
    ) -> Result<Self, ApiError> {
        config.validate()?;
        let client = build_http_client(&config.repository)?;
        let fetcher = Arc::new(HttpFetcher::with_client(client.clone()));
        let attachments = Arc::new(HttpAttachmentClient::with_client(client, &config.repository));
        Ok(Self::new(
            registry,
            RepositoryUrls::new(config.repository.base_url.clone()),
            fetcher,
            attachments,
        ))
    }

    pub fn new(
        registry: Arc<GeneratorRegistry>,
        urls: RepositoryUrls,
        fetcher: Arc<dyn RemoteFetcher>,
        attachments: Arc<dyn AttachmentClient>,
    ) -> Self {
        Self {
            registry,
            models: ModelResolver::new(Arc::clone(&fetcher), urls.clone()),
            mappings: MappingResolver::new(fetcher, urls),
            attachments: AttachmentResolver::new(attachments),
        }
    }

    pub fn registry(&self) -> &Arc<GeneratorRegistry> {
        &self.registry
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<GeneratedArtifact, ApiError> {
        match request {
            GenerationRequest::Coordinates {
                generator_key,
                id,
                parameters,
                authorization,
            } => {
                self.generate_stored(&generator_key, &id, parameters, authorization.as_deref())
                    .await
            }
            GenerationRequest::Inline {
                generator_key,
                content,
                parameters,
            } => {
                self.generate_from_inline(&content, &generator_key, parameters)
                    .await
            }
            GenerationRequest::Template {
                generator_key,
                parameters,
            } => self.generate_ad_hoc(&generator_key, parameters).await,
        }
    }

    /// Generate from a model stored in the repository.
    pub async fn generate_from_coordinates(
        &self,
        generator_key: &str,
        namespace: &str,
        name: &str,
        version: &str,
        parameters: HashMap<String, String>,
        authorization: Option<&str>,
    ) -> Result<GeneratedArtifact, ApiError> {
        let generator = self.registry.get_or_error(generator_key)?;
        let id = ModelCoordinate::new(namespace, name, version)?;
        self.run_stored(generator, &id, parameters, authorization)
            .await
    }

    /// Generate from caller-supplied content. No repository access.
    #[instrument(skip(self, content, parameters), fields(model = %content.root))]
    pub async fn generate_from_inline(
        &self,
        content: &ModelContent,
        generator_key: &str,
        parameters: HashMap<String, String>,
    ) -> Result<GeneratedArtifact, ApiError> {
        let generator = self.registry.get_or_error(generator_key)?;
        let model = self.models.resolve_content(content)?;
        info!(generator = %generator_key, model = %model.id, "Generating from inline model");

        let context = InvocationContext::simple(self.registry.new_generator_lookup(), parameters);
        Ok(GeneratorInvoker::invoke(generator, model, context).await)
    }

    /// Parameter-only generation; the plugin receives an empty template model.
    #[instrument(skip(self, parameters))]
    pub async fn generate_ad_hoc(
        &self,
        generator_key: &str,
        parameters: HashMap<String, String>,
    ) -> Result<GeneratedArtifact, ApiError> {
        let generator = self.registry.get_or_error(generator_key)?;
        info!(generator = %generator_key, "Generating from template");

        let context = InvocationContext::simple(self.registry.new_generator_lookup(), parameters);
        Ok(GeneratorInvoker::invoke(generator, ResolvedModel::template(), context).await)
    }

    async fn generate_stored(
        &self,
        generator_key: &str,
        id: &ModelCoordinate,
        parameters: HashMap<String, String>,
        authorization: Option<&str>,
    ) -> Result<GeneratedArtifact, ApiError> {
        let generator = self.registry.get_or_error(generator_key)?;
        id.validate()?;
        self.run_stored(generator, id, parameters, authorization)
            .await
    }

    #[instrument(skip(self, generator, parameters, authorization), fields(generator = %generator.key))]
    async fn run_stored(
        &self,
        generator: &Generator,
        id: &ModelCoordinate,
        parameters: HashMap<String, String>,
        authorization: Option<&str>,
    ) -> Result<GeneratedArtifact, ApiError> {
        info!(generator = %generator.key, model = %id, "Generating from stored model");
        let (model, mappings, imported_file) = tokio::join!(
            self.models.resolve(id, authorization),
            self.mappings.resolve(&generator.key, id, authorization),
            self.attachments.resolve(id),
        );
        let model = model?.ok_or_else(|| ApiError::ModelNotFound(id.clone()))?;
        debug!(
            mappings = mappings.len(),
            imported_file = imported_file.is_some(),
            "Resolved generation inputs"
        );

        let context = InvocationContext::builder(self.registry.new_generator_lookup())
            .mappings(mappings)
            .parameters(parameters)
            .imported_file(imported_file)
            .build();
        Ok(GeneratorInvoker::invoke(generator, model, context).await)
    }
}
