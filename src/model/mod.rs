//! Model representation consumed by the generation pipeline.
//!
//! Bundles fetched from the repository are unpacked into a [`ModelWorkspace`];
//! the requested root is then linked into a [`ResolvedModel`]. Mapping bundles
//! contribute [`MappingRule`]s.

pub mod document;
pub mod resolved;
pub mod workspace;

pub use document::{MappingDef, MappingDirective, ModelDocument, PrimitiveType, TypeRef};
pub use resolved::{
    ResolvedEntity, ResolvedEnumeration, ResolvedFunctionBlock, ResolvedFunctionBlockProperty,
    ResolvedModel, ResolvedProperty, ResolvedType, Subject,
};
pub use workspace::ModelWorkspace;

use crate::error::ApiError;
use crate::types::ModelCoordinate;
use serde::{Deserialize, Serialize};

/// A mapping bundle for one target platform, as handed to generators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingRule {
    pub id: ModelCoordinate,
    pub target_platform: String,
    pub references: Vec<ModelCoordinate>,
    pub directives: Vec<MappingDirective>,
}

impl From<MappingDef> for MappingRule {
    fn from(def: MappingDef) -> Self {
        Self {
            id: def.id,
            target_platform: def.target_platform,
            references: def.references,
            directives: def.rules,
        }
    }
}

/// Model content pushed directly by a caller instead of referenced by coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelContent {
    pub root: ModelCoordinate,
    #[serde(default)]
    pub models: Vec<ModelDocument>,
}

impl ModelContent {
    /// Link the root model against the rest of the payload.
    pub fn to_resolved(&self) -> Result<ResolvedModel, ApiError> {
        self.root.validate()?;
        let workspace = ModelWorkspace::from_documents(self.models.clone());
        let root = workspace.find(&self.root).ok_or_else(|| {
            ApiError::InvalidModel(format!("Root model {} is not part of the payload", self.root))
        })?;
        ResolvedModel::flatten(&workspace, root)
    }
}
