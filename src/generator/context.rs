//! Per-request invocation context handed to a generator plugin.

use crate::generator::registry::GeneratorLookup;
use crate::model::{MappingDirective, MappingRule};
use std::collections::HashMap;

/// File imported into the repository alongside a model (e.g. the vendor
/// description it was converted from).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedAttachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Everything a plugin sees besides the model itself.
///
/// Built fresh for each request and moved into the invocation; it is
/// intentionally not `Clone` so one context cannot serve two invocations.
#[derive(Debug)]
pub struct InvocationContext {
    mappings: Vec<MappingRule>,
    generators: GeneratorLookup,
    parameters: HashMap<String, String>,
    imported_file: Option<ImportedAttachment>,
}

impl InvocationContext {
    pub fn builder(generators: GeneratorLookup) -> InvocationContextBuilder {
        InvocationContextBuilder {
            mappings: Vec::new(),
            generators,
            parameters: HashMap::new(),
            imported_file: None,
        }
    }

    /// Context for requests without a stored model: no mappings, no attachment.
    pub fn simple(generators: GeneratorLookup, parameters: HashMap<String, String>) -> Self {
        Self::builder(generators).parameters(parameters).build()
    }

    pub fn mappings(&self) -> &[MappingRule] {
        &self.mappings
    }

    /// Mapping bundles for one target platform, in fetch order.
    pub fn mappings_for<'a>(&'a self, target_platform: &'a str) -> impl Iterator<Item = &'a MappingRule> + 'a {
        self.mappings
            .iter()
            .filter(move |mapping| mapping.target_platform == target_platform)
    }

    /// First directive, across mappings in order, that targets `source` with
    /// the given stereotype.
    pub fn mapped_directive(&self, source: &str, stereotype: &str) -> Option<&MappingDirective> {
        self.mappings
            .iter()
            .flat_map(|mapping| mapping.directives.iter())
            .find(|directive| {
                directive.stereotype == stereotype && directive.sources.iter().any(|s| s == source)
            })
    }

    pub fn generators(&self) -> &GeneratorLookup {
        &self.generators
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    pub fn imported_file(&self) -> Option<&ImportedAttachment> {
        self.imported_file.as_ref()
    }
}

#[derive(Debug)]
pub struct InvocationContextBuilder {
    mappings: Vec<MappingRule>,
    generators: GeneratorLookup,
    parameters: HashMap<String, String>,
    imported_file: Option<ImportedAttachment>,
}

impl InvocationContextBuilder {
    pub fn mappings(mut self, mappings: Vec<MappingRule>) -> Self {
        self.mappings = mappings;
        self
    }

    pub fn parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn imported_file(mut self, imported_file: Option<ImportedAttachment>) -> Self {
        self.imported_file = imported_file;
        self
    }

    pub fn build(self) -> InvocationContext {
        InvocationContext {
            mappings: self.mappings,
            generators: self.generators,
            parameters: self.parameters,
            imported_file: self.imported_file,
        }
    }
}
