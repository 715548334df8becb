//! genrun: Code Generator Runner
//!
//! Resolves models from a model repository (or accepts them inline), gathers
//! platform mapping rules and the model's imported source file, and runs a
//! registered code generator plugin over them. Plugin failures come back as
//! a diagnostic artifact instead of an error.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod model;
pub mod repository;
pub mod resolve;
pub mod service;
pub mod types;

pub use error::ApiError;
pub use generator::{CodeGenerator, GeneratedArtifact, GeneratedFile, InvocationContext};
pub use model::{ModelContent, ResolvedModel};
pub use service::{GenerationRequest, GenerationService};
pub use types::ModelCoordinate;
