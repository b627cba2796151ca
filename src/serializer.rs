//! Serialization of generated output.
//!
//! Scaffold code is written line by line; the inferred schema registry can also be
//! dumped as YAML or JSON for inspection.

use crate::walker::SchemaRegistry;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Joins output lines the way they are printed: each line followed by a newline.
pub fn render_lines(lines: &[String]) -> String {
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    content
}

/// Serializes the inferred schemas to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(schemas: &SchemaRegistry) -> Result<String> {
    debug!("Serializing {} schemas to YAML", schemas.len());
    serde_yaml::to_string(schemas).context("Failed to serialize schemas to YAML")
}

/// Serializes the inferred schemas to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(schemas: &SchemaRegistry) -> Result<String> {
    debug!("Serializing {} schemas to JSON", schemas.len());
    serde_json::to_string_pretty(schemas).context("Failed to serialize schemas to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// Overwrites the file if it already exists.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
