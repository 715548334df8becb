//! Resolvers for the inputs of one generation request.
//!
//! The model resolver is the only one whose absence is fatal; mapping and
//! attachment resolution degrade to "nothing found".

pub mod attachment;
pub mod mapping;
pub mod model;

pub use attachment::AttachmentResolver;
pub use mapping::MappingResolver;
pub use model::ModelResolver;
