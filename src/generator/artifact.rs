//! Generated artifacts: named files produced by one generator run.

use crate::error::ApiError;
use crate::model::{ResolvedModel, Subject};
use serde::Serialize;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const ZIP_MEDIA_TYPE: &str = "application/zip";

/// One generated file: name, declared root folder, content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    pub file_name: String,
    pub folder: String,
    pub content: Vec<u8>,
}

impl GeneratedFile {
    pub fn new(file_name: impl Into<String>, folder: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            folder: folder.into(),
            content: content.into(),
        }
    }

    /// Full path, e.g. `/generated/generation_error.log`.
    pub fn path(&self) -> String {
        let folder = self.folder.trim_end_matches('/');
        if folder.is_empty() {
            format!("/{}", self.file_name)
        } else if folder.starts_with('/') {
            format!("{}/{}", folder, self.file_name)
        } else {
            format!("/{}/{}", folder, self.file_name)
        }
    }

    pub fn content_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.content).ok()
    }
}

/// Output of one generation request, tagged with the generator key and
/// what it was generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    generator_key: String,
    subject: Subject,
    files: Vec<GeneratedFile>,
}

impl GeneratedArtifact {
    pub fn new(generator_key: impl Into<String>, subject: Subject) -> Self {
        Self {
            generator_key: generator_key.into(),
            subject,
            files: Vec::new(),
        }
    }

    pub fn for_model(model: &ResolvedModel, generator_key: impl Into<String>) -> Self {
        Self::new(generator_key, model.subject())
    }

    /// Add a file, replacing any earlier file with the same path.
    pub fn write(&mut self, file: GeneratedFile) {
        let path = file.path();
        match self.files.iter_mut().find(|existing| existing.path() == path) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    pub fn with_file(mut self, file: GeneratedFile) -> Self {
        self.write(file);
        self
    }

    pub fn generator_key(&self) -> &str {
        &self.generator_key
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.path() == path)
    }

    /// Download name: `{key}_{name}_{version}.zip` or `{key}_template.zip`.
    pub fn file_name(&self) -> String {
        match &self.subject {
            Subject::Model(id) => format!("{}_{}_{}.zip", self.generator_key, id.name(), id.version()),
            Subject::Template => format!("{}_template.zip", self.generator_key),
        }
    }

    pub fn media_type(&self) -> &'static str {
        ZIP_MEDIA_TYPE
    }

    /// Serialize as a zip archive. Output depends only on the files, so the
    /// same artifact always yields the same bytes.
    pub fn to_zip(&self) -> Result<Vec<u8>, ApiError> {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for file in &self.files {
            let entry = file.path().trim_start_matches('/').to_string();
            writer
                .start_file(entry, options)
                .map_err(|e| ApiError::PackagingFailed(e.to_string()))?;
            writer.write_all(&file.content)?;
        }
        let cursor = writer
            .finish()
            .map_err(|e| ApiError::PackagingFailed(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}
