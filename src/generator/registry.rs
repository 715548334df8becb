//! Generator registry: the set of plugins this runner can invoke.

use crate::error::ApiError;
use crate::generator::{CodeGenerator, GeneratorInfo};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A registered plugin: its key, descriptive info, and shared instance.
#[derive(Clone)]
pub struct Generator {
    pub key: String,
    pub info: GeneratorInfo,
    pub instance: Arc<dyn CodeGenerator>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("key", &self.key)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Generators keyed by service key.
///
/// Populated at startup, then shared read-only behind `Arc` across requests.
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<String, Generator>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under its service key.
    pub fn register(&mut self, instance: Arc<dyn CodeGenerator>) -> Result<(), ApiError> {
        let key = instance.service_key().to_string();
        validate_key(&key)?;
        if self.generators.contains_key(&key) {
            return Err(ApiError::DuplicateGenerator(key));
        }
        let info = instance.info();
        self.generators.insert(
            key.clone(),
            Generator {
                key,
                info,
                instance,
            },
        );
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Generator> {
        self.generators.get(key)
    }

    pub fn get_or_error(&self, key: &str) -> Result<&Generator, ApiError> {
        self.get(key)
            .ok_or_else(|| ApiError::GeneratorNotFound(key.to_string()))
    }

    /// All generators, sorted by key.
    pub fn list(&self) -> Vec<&Generator> {
        self.generators.values().collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Lookup handle for composite generators that delegate to others.
    pub fn new_generator_lookup(self: &Arc<Self>) -> GeneratorLookup {
        GeneratorLookup {
            registry: Arc::clone(self),
        }
    }
}

/// Resolves generator keys to plugin instances from inside an invocation.
#[derive(Debug, Clone)]
pub struct GeneratorLookup {
    registry: Arc<GeneratorRegistry>,
}

impl GeneratorLookup {
    pub fn lookup(&self, key: &str) -> Option<Arc<dyn CodeGenerator>> {
        self.registry
            .get(key)
            .map(|generator| Arc::clone(&generator.instance))
    }
}

/// Keys appear in repository URLs, so they are restricted to a safe charset.
fn validate_key(key: &str) -> Result<(), ApiError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidGeneratorKey(key.to_string()))
    }
}
