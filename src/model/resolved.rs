//! Resolved models: the flattened hierarchy handed to generator plugins.
//!
//! Flattening inlines every referenced function block and datatype, and folds
//! super-type chains into their subtypes (inherited members first). Each
//! distinct type is resolved once and shared through `Arc`.

use crate::error::ApiError;
use crate::model::document::{
    EntityDef, FunctionBlockDef, InformationModelDef, ModelDocument, PrimitiveType, PropertyDef,
    TypeRef,
};
use crate::model::workspace::ModelWorkspace;
use crate::types::ModelCoordinate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Placeholder identity used by ad-hoc template generation.
pub const TEMPLATE_NAMESPACE: &str = "com.mycompany";
pub const TEMPLATE_NAME: &str = "Template";
pub const TEMPLATE_VERSION: &str = "0.0.1";

/// What an artifact was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Subject {
    Model(ModelCoordinate),
    Template,
}

impl Subject {
    pub fn model_coordinate(&self) -> Option<&ModelCoordinate> {
        match self {
            Subject::Model(id) => Some(id),
            Subject::Template => None,
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Model(id) => write!(f, "{}", id),
            Subject::Template => f.write_str("template"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedModel {
    pub id: ModelCoordinate,
    pub display_name: String,
    pub description: Option<String>,
    pub function_blocks: Vec<ResolvedFunctionBlockProperty>,
    #[serde(skip)]
    template: bool,
}

impl ResolvedModel {
    /// Empty model standing in for parameter-only generation.
    pub fn template() -> Self {
        Self {
            id: ModelCoordinate::from_static(TEMPLATE_NAMESPACE, TEMPLATE_NAME, TEMPLATE_VERSION),
            display_name: TEMPLATE_NAME.to_string(),
            description: None,
            function_blocks: Vec::new(),
            template: true,
        }
    }

    pub fn is_template(&self) -> bool {
        self.template
    }

    pub fn subject(&self) -> Subject {
        if self.template {
            Subject::Template
        } else {
            Subject::Model(self.id.clone())
        }
    }

    /// Link and flatten `root` against the documents of `workspace`.
    pub fn flatten(workspace: &ModelWorkspace, root: &ModelDocument) -> Result<Self, ApiError> {
        let mut linker = Linker::new(workspace);
        match root {
            ModelDocument::InformationModel(def) => linker.information_model(def),
            ModelDocument::FunctionBlock(def) => {
                let function_block = linker.function_block(def)?;
                Ok(Self {
                    id: def.id.clone(),
                    display_name: display_name(&def.display_name, &def.id),
                    description: def.description.clone(),
                    function_blocks: vec![ResolvedFunctionBlockProperty {
                        name: lowercase_first(def.id.name()),
                        description: def.description.clone(),
                        multiple: false,
                        function_block,
                    }],
                    template: false,
                })
            }
            other => Err(ApiError::InvalidModel(format!(
                "{} is a {} and cannot be generated from",
                other.id(),
                other.kind_label()
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedFunctionBlockProperty {
    pub name: String,
    pub description: Option<String>,
    pub multiple: bool,
    pub function_block: Arc<ResolvedFunctionBlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedFunctionBlock {
    pub id: ModelCoordinate,
    pub display_name: String,
    pub description: Option<String>,
    pub status: Vec<ResolvedProperty>,
    pub configuration: Vec<ResolvedProperty>,
    pub events: Vec<ResolvedEvent>,
    pub operations: Vec<ResolvedOperation>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedProperty {
    pub name: String,
    pub description: Option<String>,
    pub mandatory: bool,
    pub multiple: bool,
    #[serde(rename = "type")]
    pub ty: ResolvedType,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEvent {
    pub name: String,
    pub properties: Vec<ResolvedProperty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedOperation {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<ResolvedProperty>,
    pub returns: Option<ResolvedType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedType {
    Primitive(PrimitiveType),
    Entity(Arc<ResolvedEntity>),
    Enumeration(Arc<ResolvedEnumeration>),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEntity {
    pub id: ModelCoordinate,
    pub display_name: String,
    pub description: Option<String>,
    pub properties: Vec<ResolvedProperty>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEnumeration {
    pub id: ModelCoordinate,
    pub description: Option<String>,
    pub literals: Vec<String>,
}

/// Per-flatten memo of resolved types plus the chain currently being linked.
struct Linker<'a> {
    workspace: &'a ModelWorkspace,
    function_blocks: HashMap<ModelCoordinate, Arc<ResolvedFunctionBlock>>,
    entities: HashMap<ModelCoordinate, Arc<ResolvedEntity>>,
    enumerations: HashMap<ModelCoordinate, Arc<ResolvedEnumeration>>,
    in_progress: HashSet<ModelCoordinate>,
}

impl<'a> Linker<'a> {
    fn new(workspace: &'a ModelWorkspace) -> Self {
        Self {
            workspace,
            function_blocks: HashMap::new(),
            entities: HashMap::new(),
            enumerations: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn lookup(&self, id: &ModelCoordinate, referrer: &ModelCoordinate) -> Result<&'a ModelDocument, ApiError> {
        self.workspace.find(id).ok_or_else(|| {
            ApiError::InvalidModel(format!("{} references {} which is not in the bundle", referrer, id))
        })
    }

    fn enter(&mut self, id: &ModelCoordinate) -> Result<(), ApiError> {
        if !self.in_progress.insert(id.clone()) {
            return Err(ApiError::InvalidModel(format!("Cyclic reference through {}", id)));
        }
        Ok(())
    }

    fn information_model(&mut self, def: &InformationModelDef) -> Result<ResolvedModel, ApiError> {
        let mut function_blocks = Vec::with_capacity(def.function_blocks.len());
        for property in &def.function_blocks {
            let function_block = match self.lookup(&property.type_ref, &def.id)? {
                ModelDocument::FunctionBlock(fb) => self.function_block(fb)?,
                other => {
                    return Err(ApiError::InvalidModel(format!(
                        "Property {} of {} must reference a function block, found {} {}",
                        property.name,
                        def.id,
                        other.kind_label(),
                        other.id()
                    )))
                }
            };
            function_blocks.push(ResolvedFunctionBlockProperty {
                name: property.name.clone(),
                description: property.description.clone(),
                multiple: property.multiple,
                function_block,
            });
        }

        Ok(ResolvedModel {
            id: def.id.clone(),
            display_name: display_name(&def.display_name, &def.id),
            description: def.description.clone(),
            function_blocks,
            template: false,
        })
    }

    fn function_block(&mut self, def: &FunctionBlockDef) -> Result<Arc<ResolvedFunctionBlock>, ApiError> {
        if let Some(resolved) = self.function_blocks.get(&def.id) {
            return Ok(Arc::clone(resolved));
        }
        self.enter(&def.id)?;

        let mut resolved = match &def.super_type {
            Some(super_id) => match self.lookup(super_id, &def.id)? {
                ModelDocument::FunctionBlock(parent) => (*self.function_block(parent)?).clone(),
                other => {
                    return Err(ApiError::InvalidModel(format!(
                        "{} extends {} {}, expected a function block",
                        def.id,
                        other.kind_label(),
                        other.id()
                    )))
                }
            },
            None => ResolvedFunctionBlock {
                id: def.id.clone(),
                display_name: String::new(),
                description: None,
                status: Vec::new(),
                configuration: Vec::new(),
                events: Vec::new(),
                operations: Vec::new(),
            },
        };

        resolved.id = def.id.clone();
        resolved.display_name = display_name(&def.display_name, &def.id);
        resolved.description = def.description.clone();
        let status = self.properties(&def.status, &def.id)?;
        resolved.status.extend(status);
        let configuration = self.properties(&def.configuration, &def.id)?;
        resolved.configuration.extend(configuration);
        for event in &def.events {
            let properties = self.properties(&event.properties, &def.id)?;
            resolved.events.push(ResolvedEvent {
                name: event.name.clone(),
                properties,
            });
        }
        for operation in &def.operations {
            let params = self.properties(&operation.params, &def.id)?;
            let returns = operation
                .returns
                .as_ref()
                .map(|ty| self.type_ref(ty, &def.id))
                .transpose()?;
            resolved.operations.push(ResolvedOperation {
                name: operation.name.clone(),
                description: operation.description.clone(),
                params,
                returns,
            });
        }

        self.in_progress.remove(&def.id);
        let resolved = Arc::new(resolved);
        self.function_blocks.insert(def.id.clone(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn entity(&mut self, def: &EntityDef) -> Result<Arc<ResolvedEntity>, ApiError> {
        if let Some(resolved) = self.entities.get(&def.id) {
            return Ok(Arc::clone(resolved));
        }
        self.enter(&def.id)?;

        let mut properties = match &def.super_type {
            Some(super_id) => match self.lookup(super_id, &def.id)? {
                ModelDocument::Entity(parent) => self.entity(parent)?.properties.clone(),
                other => {
                    return Err(ApiError::InvalidModel(format!(
                        "{} extends {} {}, expected an entity",
                        def.id,
                        other.kind_label(),
                        other.id()
                    )))
                }
            },
            None => Vec::new(),
        };
        properties.extend(self.properties(&def.properties, &def.id)?);

        self.in_progress.remove(&def.id);
        let resolved = Arc::new(ResolvedEntity {
            id: def.id.clone(),
            display_name: display_name(&def.display_name, &def.id),
            description: def.description.clone(),
            properties,
        });
        self.entities.insert(def.id.clone(), Arc::clone(&resolved));
        Ok(resolved)
    }

    fn properties(
        &mut self,
        defs: &[PropertyDef],
        owner: &ModelCoordinate,
    ) -> Result<Vec<ResolvedProperty>, ApiError> {
        defs.iter()
            .map(|def| {
                Ok(ResolvedProperty {
                    name: def.name.clone(),
                    description: def.description.clone(),
                    mandatory: def.mandatory,
                    multiple: def.multiple,
                    ty: self.type_ref(&def.ty, owner)?,
                })
            })
            .collect()
    }

    fn type_ref(&mut self, ty: &TypeRef, owner: &ModelCoordinate) -> Result<ResolvedType, ApiError> {
        let id = match ty {
            TypeRef::Primitive(primitive) => return Ok(ResolvedType::Primitive(*primitive)),
            TypeRef::Reference(id) => id,
        };
        match self.lookup(id, owner)? {
            ModelDocument::Entity(def) => Ok(ResolvedType::Entity(self.entity(def)?)),
            ModelDocument::Enumeration(def) => {
                let resolved = self
                    .enumerations
                    .entry(def.id.clone())
                    .or_insert_with(|| {
                        Arc::new(ResolvedEnumeration {
                            id: def.id.clone(),
                            description: def.description.clone(),
                            literals: def.literals.clone(),
                        })
                    });
                Ok(ResolvedType::Enumeration(Arc::clone(resolved)))
            }
            other => Err(ApiError::InvalidModel(format!(
                "{} uses {} {} as a datatype",
                owner,
                other.kind_label(),
                other.id()
            ))),
        }
    }
}

fn display_name(declared: &Option<String>, id: &ModelCoordinate) -> String {
    declared.clone().unwrap_or_else(|| id.name().to_string())
}

fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
