//! Model documents as they appear inside repository bundles.

use crate::types::ModelCoordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One model definition read from a bundle entry or an inline payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelDocument {
    InformationModel(InformationModelDef),
    FunctionBlock(FunctionBlockDef),
    Entity(EntityDef),
    Enumeration(EnumerationDef),
    Mapping(MappingDef),
}

impl ModelDocument {
    pub fn id(&self) -> &ModelCoordinate {
        match self {
            ModelDocument::InformationModel(def) => &def.id,
            ModelDocument::FunctionBlock(def) => &def.id,
            ModelDocument::Entity(def) => &def.id,
            ModelDocument::Enumeration(def) => &def.id,
            ModelDocument::Mapping(def) => &def.id,
        }
    }

    /// Declared model name, the part matched when selecting a bundle root.
    pub fn name(&self) -> &str {
        self.id().name()
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ModelDocument::InformationModel(_) => "information model",
            ModelDocument::FunctionBlock(_) => "function block",
            ModelDocument::Entity(_) => "entity",
            ModelDocument::Enumeration(_) => "enumeration",
            ModelDocument::Mapping(_) => "mapping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformationModelDef {
    pub id: ModelCoordinate,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub function_blocks: Vec<FunctionBlockPropertyDef>,
}

/// A named slot in an information model typed by a function block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBlockPropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: ModelCoordinate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBlockDef {
    pub id: ModelCoordinate,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub super_type: Option<ModelCoordinate>,
    #[serde(default)]
    pub status: Vec<PropertyDef>,
    #[serde(default)]
    pub configuration: Vec<PropertyDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    pub id: ModelCoordinate,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub super_type: Option<ModelCoordinate>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumerationDef {
    pub id: ModelCoordinate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub literals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_mandatory")]
    pub mandatory: bool,
    #[serde(default)]
    pub multiple: bool,
}

fn default_mandatory() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub params: Vec<PropertyDef>,
    #[serde(default)]
    pub returns: Option<TypeRef>,
}

/// A property type: a primitive by name, or a reference to a datatype model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Reference(ModelCoordinate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Int,
    Long,
    Short,
    Float,
    Double,
    Boolean,
    Datetime,
    Byte,
    Base64Binary,
}

/// Platform-specific mapping document for one target platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDef {
    pub id: ModelCoordinate,
    pub target_platform: String,
    #[serde(default)]
    pub references: Vec<ModelCoordinate>,
    #[serde(default)]
    pub rules: Vec<MappingDirective>,
}

/// One transformation directive: which source elements it targets and the
/// stereotype/attributes the generator should apply to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingDirective {
    #[serde(default)]
    pub sources: Vec<String>,
    pub stereotype: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}
