//! Model workspace: the documents unpacked from one repository bundle.

use crate::error::ApiError;
use crate::model::document::ModelDocument;
use crate::model::MappingRule;
use crate::types::ModelCoordinate;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::trace;
use zip::ZipArchive;

/// Bundle entry extensions that hold a model document.
pub const MODEL_FILE_EXTENSIONS: &[&str] = &["json", "infomodel", "fbmodel", "type", "mapping"];

/// Upper bound on one unpacked model document.
pub const MAX_ENTRY_BYTES: u64 = 16 * 1024 * 1024;

/// Documents of one bundle, in archive order.
#[derive(Debug, Clone, Default)]
pub struct ModelWorkspace {
    models: Vec<ModelDocument>,
}

impl ModelWorkspace {
    pub fn from_documents(models: Vec<ModelDocument>) -> Self {
        Self { models }
    }

    /// Unpack a zip bundle. Entries with other extensions are skipped.
    pub fn from_zip(bytes: &[u8]) -> Result<Self, ApiError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut models = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let entry_name = entry.name().to_string();
            if !is_model_entry(&entry_name) {
                trace!(entry = %entry_name, "Skipping non-model bundle entry");
                continue;
            }

            // Declared sizes come from the remote bundle and are not trusted.
            if entry.size() > MAX_ENTRY_BYTES {
                return Err(oversized_entry(&entry_name));
            }
            let mut raw = Vec::new();
            (&mut entry).take(MAX_ENTRY_BYTES + 1).read_to_end(&mut raw)?;
            if raw.len() as u64 > MAX_ENTRY_BYTES {
                return Err(oversized_entry(&entry_name));
            }
            let document: ModelDocument = serde_json::from_slice(&raw).map_err(|e| {
                ApiError::InvalidBundle(format!("Entry {} is not a model document: {}", entry_name, e))
            })?;
            models.push(document);
        }

        Ok(Self { models })
    }

    pub fn models(&self) -> &[ModelDocument] {
        &self.models
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn find(&self, id: &ModelCoordinate) -> Option<&ModelDocument> {
        self.models.iter().find(|model| model.id() == id)
    }

    /// First document whose declared name matches.
    pub fn find_by_name(&self, name: &str) -> Option<&ModelDocument> {
        self.models.iter().find(|model| model.name() == name)
    }

    /// Keep only mapping documents, preserving order.
    pub fn into_mappings(self) -> Vec<MappingRule> {
        self.models
            .into_iter()
            .filter_map(|model| match model {
                ModelDocument::Mapping(def) => Some(MappingRule::from(def)),
                _ => None,
            })
            .collect()
    }
}

fn oversized_entry(entry_name: &str) -> ApiError {
    ApiError::InvalidBundle(format!(
        "Entry {} exceeds {} bytes",
        entry_name, MAX_ENTRY_BYTES
    ))
}

fn is_model_entry(entry_name: &str) -> bool {
    Path::new(entry_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MODEL_FILE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
