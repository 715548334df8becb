//! Configuration sources, applied in precedence order by the loader.

pub mod environment;
pub mod global_file;
pub mod workspace_file;
