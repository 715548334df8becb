//! Built-in diagnostic generator.

use crate::generator::{
    CodeGenerator, GeneratedArtifact, GeneratedFile, GeneratorInfo, InvocationContext,
};
use crate::model::ResolvedModel;
use anyhow::Context as _;
use serde_json::json;
use std::collections::BTreeMap;

pub const MODEL_DUMP_KEY: &str = "model-dump";

/// Writes the resolved model and the invocation inputs as JSON, for
/// inspecting what a real generator would receive.
#[derive(Debug, Default)]
pub struct ModelDumpGenerator;

impl CodeGenerator for ModelDumpGenerator {
    fn service_key(&self) -> &str {
        MODEL_DUMP_KEY
    }

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            name: "Model Dump".to_string(),
            description: "Writes the resolved model and invocation inputs as JSON".to_string(),
            tags: vec!["diagnostic".to_string()],
        }
    }

    fn generate(
        &self,
        model: &ResolvedModel,
        context: &InvocationContext,
    ) -> anyhow::Result<GeneratedArtifact> {
        let folder = format!("/{}", model.id.name());

        let model_json =
            serde_json::to_string_pretty(model).context("serializing resolved model")?;

        let parameters: BTreeMap<_, _> = context.parameters().iter().collect();
        let invocation = json!({
            "subject": model.subject(),
            "parameters": parameters,
            "mappings": context.mappings(),
            "imported_file": context.imported_file().map(|file| json!({
                "filename": file.filename,
                "size": file.content.len(),
            })),
        });
        let invocation_json =
            serde_json::to_string_pretty(&invocation).context("serializing invocation")?;

        Ok(GeneratedArtifact::for_model(model, MODEL_DUMP_KEY)
            .with_file(GeneratedFile::new("model.json", folder.clone(), model_json))
            .with_file(GeneratedFile::new("invocation.json", folder, invocation_json)))
    }
}
