//! CLI presentation: text and JSON rendering of command results.

use crate::error::ApiError;
use crate::generator::{GeneratedArtifact, Generator};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;
use std::path::Path;

pub fn format_generator_list(generators: &[&Generator], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        let list: Vec<_> = generators
            .iter()
            .map(|g| {
                json!({
                    "key": g.key,
                    "name": g.info.name,
                    "description": g.info.description,
                    "tags": g.info.tags,
                })
            })
            .collect();
        let out = json!({ "generators": list, "total": generators.len() });
        return serde_json::to_string_pretty(&out)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render JSON: {}", e)));
    }

    if generators.is_empty() {
        return Ok("No generators registered.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Key", "Name", "Tags", "Description"]);
    for generator in generators {
        table.add_row(vec![
            generator.key.clone(),
            generator.info.name.clone(),
            generator.info.tags.join(", "),
            generator.info.description.clone(),
        ]);
    }
    Ok(format!("{}\n\nTotal: {} generator(s)", table, generators.len()))
}

pub fn format_generation_summary(artifact: &GeneratedArtifact, written_to: &Path) -> String {
    let mut output = format!(
        "Generated {} with {} ({} file(s))\n",
        artifact.subject(),
        artifact.generator_key(),
        artifact.files().len()
    );
    for file in artifact.files() {
        output.push_str(&format!("  {}\n", file.path()));
    }
    output.push_str(&format!("Written to {}", written_to.display()));
    output
}
