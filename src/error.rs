//! Error types for the generator runner.

use crate::types::ModelCoordinate;
use thiserror::Error;

/// Errors surfaced by the generation pipeline and its collaborators.
///
/// Plugin failures never appear here: they are recovered at the invocation
/// boundary and turned into a diagnostic artifact.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Generator {0} not found")]
    GeneratorNotFound(String),

    #[error("Model {0} not found")]
    ModelNotFound(ModelCoordinate),

    #[error("Invalid model coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid generator key: {0}")]
    InvalidGeneratorKey(String),

    #[error("Generator already registered: {0}")]
    DuplicateGenerator(String),

    #[error("Invalid model bundle: {0}")]
    InvalidBundle(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Repository request failed: {0}")]
    RepositoryRequestFailed(String),

    #[error("Artifact packaging failed: {0}")]
    PackagingFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// True for the terminal not-found outcomes (unknown generator or model).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::GeneratorNotFound(_) | ApiError::ModelNotFound(_)
        )
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<zip::result::ZipError> for ApiError {
    fn from(err: zip::result::ZipError) -> Self {
        ApiError::InvalidBundle(err.to_string())
    }
}
