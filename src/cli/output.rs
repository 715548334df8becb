//! CLI output: error mapping and artifact files.

use crate::error::ApiError;
use crate::generator::GeneratedArtifact;
use std::path::{Path, PathBuf};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    if e.is_not_found() {
        format!("Not found: {}", e)
    } else {
        e.to_string()
    }
}

/// Write the artifact as a zip archive.
///
/// `output` may name a file or an existing directory; without it the archive
/// lands in the current directory under the artifact's own file name.
pub fn write_artifact(
    artifact: &GeneratedArtifact,
    output: Option<&Path>,
) -> Result<PathBuf, ApiError> {
    let target = match output {
        Some(path) if path.is_dir() => path.join(artifact.file_name()),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(artifact.file_name()),
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, artifact.to_zip()?)?;
    Ok(target)
}
