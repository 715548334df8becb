//! Generator Plugin Interface
//!
//! A generator turns a [`ResolvedModel`] plus an [`InvocationContext`] into a
//! [`GeneratedArtifact`]. Instances are registered once and shared by all
//! requests, so they must be callable concurrently and keep no per-request
//! state of their own.

pub mod artifact;
pub mod builtin;
pub mod context;
pub mod invoker;
pub mod registry;

pub use artifact::{GeneratedArtifact, GeneratedFile};
pub use context::{ImportedAttachment, InvocationContext, InvocationContextBuilder};
pub use invoker::{GeneratorInvoker, ResultPackager, ERROR_LOG_FILE_NAME, ERROR_LOG_FOLDER};
pub use registry::{Generator, GeneratorLookup, GeneratorRegistry};

use crate::model::ResolvedModel;
use serde::Serialize;

/// Descriptive information shown when listing generators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// A code generator plugin.
///
/// `generate` runs on a blocking worker thread. Returned errors and panics
/// are both recovered by the runner and packaged as a diagnostic artifact.
pub trait CodeGenerator: Send + Sync {
    /// Registry key; also the platform key used to fetch mappings.
    fn service_key(&self) -> &str;

    fn info(&self) -> GeneratorInfo {
        GeneratorInfo {
            name: self.service_key().to_string(),
            ..GeneratorInfo::default()
        }
    }

    fn generate(
        &self,
        model: &ResolvedModel,
        context: &InvocationContext,
    ) -> anyhow::Result<GeneratedArtifact>;
}
