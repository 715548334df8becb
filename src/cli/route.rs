//! CLI route: single route table and run context. Dispatches to the
//! generation service and presentation.

use crate::cli::output::write_artifact;
use crate::cli::parse::{Commands, GenerateArgs};
use crate::cli::presentation::{format_generation_summary, format_generator_list};
use crate::config::{ConfigLoader, GeneratorConfig};
use crate::error::ApiError;
use crate::generator::GeneratorRegistry;
use crate::model::ModelContent;
use crate::service::{GenerationRequest, GenerationService};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: loaded config and the generation service.
pub struct RunContext {
    config: GeneratorConfig,
    service: GenerationService,
}

impl RunContext {
    /// Load configuration and build the service around `registry`.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        registry: Arc<GeneratorRegistry>,
    ) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        let service = GenerationService::from_config(&config, registry)?;
        Ok(Self { config, service })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Generators { format } => {
                format_generator_list(&self.service.registry().list(), format)
            }
            Commands::Generate { model, auth, args } => {
                let request = GenerationRequest::Coordinates {
                    generator_key: args.generator.clone(),
                    id: model.clone(),
                    parameters: parameters(args),
                    authorization: auth.clone(),
                };
                self.run_generation(request, args).await
            }
            Commands::Inline { content, args } => {
                let request = GenerationRequest::Inline {
                    generator_key: args.generator.clone(),
                    content: read_model_content(content)?,
                    parameters: parameters(args),
                };
                self.run_generation(request, args).await
            }
            Commands::Template { args } => {
                let request = GenerationRequest::Template {
                    generator_key: args.generator.clone(),
                    parameters: parameters(args),
                };
                self.run_generation(request, args).await
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    async fn run_generation(
        &self,
        request: GenerationRequest,
        args: &GenerateArgs,
    ) -> Result<String, ApiError> {
        let started = Instant::now();
        let generator_key = request.generator_key().to_string();
        let artifact = self.service.generate(request).await?;
        let written_to = write_artifact(&artifact, args.output.as_deref())?;
        info!(
            generator = %generator_key,
            path = %written_to.display(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Artifact written"
        );
        Ok(format_generation_summary(&artifact, &written_to))
    }
}

fn parameters(args: &GenerateArgs) -> HashMap<String, String> {
    args.params.iter().cloned().collect()
}

fn read_model_content(path: &Path) -> Result<ModelContent, ApiError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        ApiError::InvalidModel(format!("{} is not valid model content: {}", path.display(), e))
    })
}
