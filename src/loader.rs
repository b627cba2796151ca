//! Spec Loader: reads a RAML document into the [`ApiSpec`] resource tree.

use crate::error::{Result, ScaffoldError};
use crate::model::{ApiSpec, MediaType, MethodSpec, ResourceNode, ResponseSpec, Verb};
use log::{debug, warn};
use serde_json::{Map as JsonMap, Value as JsonValue};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// RAML method keys that are valid in a document but produce no scaffold code.
const UNSUPPORTED_METHODS: &[&str] = &["head", "options", "trace", "connect"];

/// Media type assumed for bodies declared without a content-type key.
const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Loader for RAML API descriptions.
///
/// The `SpecLoader` reads a RAML document (YAML syntax) and turns it into an [`ApiSpec`]
/// resource tree. Besides plain inline schemas it understands the common ways RAML
/// documents attach JSON schemas to bodies:
///
/// - inline JSON text (`schema: '{ "type": "object", ... }'`)
/// - inline YAML mappings (`type: object` with `properties:`)
/// - names of entries declared under the top-level `schemas:` or `types:` keys
/// - `!include file.json` tags, resolved relative to the document
///
/// # Example
///
/// ```no_run
/// use raml_scaffold::loader::SpecLoader;
/// use std::path::Path;
///
/// let spec = SpecLoader::load_file(Path::new("api.raml")).unwrap();
/// println!("Loaded {} top-level resources", spec.resources.len());
/// ```
pub struct SpecLoader {
    /// Directory `!include` paths are resolved against
    base_dir: PathBuf,
    /// Named schemas from `schemas:` / `types:`, as JSON text
    named_schemas: HashMap<String, String>,
    /// Media type for bodies that omit a content-type key
    default_media_type: String,
}

impl SpecLoader {
    /// Reads and parses a RAML file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or references
    /// an include that cannot be read.
    pub fn load_file(path: &Path) -> Result<ApiSpec> {
        debug!("Loading RAML file: {}", path.display());

        let content = fs::read_to_string(path).map_err(|source| ScaffoldError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::load_str(&content, &base_dir)
    }

    /// Parses RAML text. `base_dir` is used to resolve `!include` tags.
    pub fn load_str(content: &str, base_dir: &Path) -> Result<ApiSpec> {
        let root: Value = serde_yaml::from_str(content)?;
        let root = match root {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err(ScaffoldError::InvalidSpec("document is empty".to_string())),
            _ => {
                return Err(ScaffoldError::InvalidSpec(
                    "document root must be a mapping".to_string(),
                ))
            }
        };

        let mut loader = SpecLoader {
            base_dir: base_dir.to_path_buf(),
            named_schemas: HashMap::new(),
            default_media_type: root
                .get("mediaType")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_MEDIA_TYPE)
                .to_string(),
        };

        loader.collect_named_schemas(root.get("schemas"))?;
        loader.collect_named_schemas(root.get("types"))?;
        debug!("Registered {} named schemas", loader.named_schemas.len());

        let mut resources = Vec::new();
        for (key, value) in &root {
            if let Some(uri) = key.as_str().filter(|k| k.starts_with('/')) {
                resources.push(loader.parse_resource(uri, value)?);
            }
        }

        debug!("Loaded {} top-level resources", resources.len());

        Ok(ApiSpec {
            title: root.get("title").and_then(scalar_to_string),
            version: root.get("version").and_then(scalar_to_string),
            resources,
        })
    }

    /// Named schemas may be declared as a mapping (RAML 1.0 `types:`) or as a
    /// sequence of single-entry mappings (RAML 0.8 `schemas:`).
    fn collect_named_schemas(&mut self, value: Option<&Value>) -> Result<()> {
        match value {
            Some(Value::Mapping(mapping)) => self.register_named(mapping),
            Some(Value::Sequence(items)) => {
                for item in items {
                    if let Value::Mapping(mapping) = item {
                        self.register_named(mapping)?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn register_named(&mut self, mapping: &Mapping) -> Result<()> {
        for (key, value) in mapping {
            let Some(name) = key.as_str() else { continue };
            if let Some(schema) = self.schema_of(value)? {
                debug!("Named schema: {}", name);
                self.named_schemas.insert(name.to_string(), schema);
            }
        }
        Ok(())
    }

    fn parse_resource(&self, relative_uri: &str, value: &Value) -> Result<ResourceNode> {
        let mut node = ResourceNode::new(relative_uri);

        let Some(mapping) = value.as_mapping() else {
            return Ok(node);
        };

        for (key, entry) in mapping {
            let Some(key) = key.as_str() else { continue };

            if key.starts_with('/') {
                node.children.push(self.parse_resource(key, entry)?);
            } else if let Some(verb) = Verb::from_key(key) {
                node.methods.push(self.parse_method(verb, entry)?);
            } else if UNSUPPORTED_METHODS.contains(&key) {
                warn!(
                    "Skipping unsupported method `{}` on resource {}",
                    key, relative_uri
                );
            }
        }

        Ok(node)
    }

    fn parse_method(&self, verb: Verb, value: &Value) -> Result<MethodSpec> {
        let mut method = MethodSpec::new(verb);

        let Some(mapping) = value.as_mapping() else {
            return Ok(method);
        };

        if let Some(body) = mapping.get("body") {
            method.body = self.parse_body(body)?;
        }

        if let Some(Value::Mapping(responses)) = mapping.get("responses") {
            for (code, response) in responses {
                let Some(status) = scalar_to_string(code) else { continue };
                let body = match response.as_mapping().and_then(|r| r.get("body")) {
                    Some(body) => self.parse_body(body)?,
                    None => Vec::new(),
                };
                method.responses.push(ResponseSpec { status, body });
            }
        }

        Ok(method)
    }

    fn parse_body(&self, value: &Value) -> Result<Vec<MediaType>> {
        let Some(mapping) = value.as_mapping() else {
            return Ok(Vec::new());
        };

        let keyed_by_content_type = mapping
            .iter()
            .filter_map(|(k, _)| k.as_str())
            .any(|k| k.contains('/'));

        // RAML 1.0 allows the body to declare its type directly
        if !keyed_by_content_type {
            let schema = self.schema_of(value)?;
            return Ok(vec![MediaType::new(&self.default_media_type, schema)]);
        }

        let mut media_types = Vec::new();
        for (key, entry) in mapping {
            let Some(content_type) = key.as_str() else { continue };
            media_types.push(MediaType::new(content_type, self.schema_of(entry)?));
        }
        Ok(media_types)
    }

    /// Finds the JSON schema attached to a body entry or named declaration.
    fn schema_of(&self, entry: &Value) -> Result<Option<String>> {
        let Some(mapping) = entry.as_mapping() else {
            return self.resolve_schema(entry);
        };

        if let Some(schema) = mapping.get("schema") {
            return self.resolve_schema(schema);
        }

        if mapping.contains_key("properties") {
            let json = type_declaration_to_json(entry)?;
            return Ok(Some(serde_json::to_string(&json)?));
        }

        match mapping.get("type") {
            Some(declared) => self.resolve_schema(declared),
            None => Ok(None),
        }
    }

    fn resolve_schema(&self, value: &Value) -> Result<Option<String>> {
        match value {
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.starts_with('{') {
                    Ok(Some(text.clone()))
                } else if let Some(named) = self.named_schemas.get(trimmed) {
                    Ok(Some(named.clone()))
                } else {
                    debug!("`{}` does not name a JSON schema", trimmed);
                    Ok(None)
                }
            }
            Value::Mapping(_) => Ok(Some(serde_json::to_string(value)?)),
            Value::Tagged(tagged) if tagged.tag == "include" => {
                let target = tagged.value.as_str().ok_or_else(|| {
                    ScaffoldError::InvalidSpec("!include expects a file path".to_string())
                })?;
                self.resolve_include(target)
            }
            _ => Ok(None),
        }
    }

    fn resolve_include(&self, target: &str) -> Result<Option<String>> {
        let path = self.base_dir.join(target);
        debug!("Resolving include: {}", path.display());

        let content = fs::read_to_string(&path).map_err(|source| ScaffoldError::Io {
            path: path.clone(),
            source,
        })?;

        if content.trim_start().starts_with('{') {
            return Ok(Some(content));
        }

        let value: Value = serde_yaml::from_str(&content)?;
        self.resolve_schema(&value)
    }
}

/// Converts a RAML 1.0 object type declaration into an equivalent JSON schema.
///
/// RAML properties are required unless the name ends in `?` or the property sets
/// `required: false`. The `?` marker is not part of the property name. A declaration
/// that already carries a JSON-schema `required` array keeps its own semantics.
fn type_declaration_to_json(entry: &Value) -> Result<JsonValue> {
    let mut json = serde_json::to_value(entry)?;
    let Some(object) = json.as_object_mut() else {
        return Ok(json);
    };

    object
        .entry("type")
        .or_insert_with(|| JsonValue::String("object".to_string()));

    if object.get("required").is_some_and(JsonValue::is_array) {
        return Ok(json);
    }

    let Some(JsonValue::Object(properties)) = object.get_mut("properties") else {
        return Ok(json);
    };

    let mut required = Vec::new();
    let mut normalized = JsonMap::with_capacity(properties.len());
    for (key, mut property) in std::mem::take(properties) {
        let (name, optional) = match key.strip_suffix('?') {
            Some(stripped) => (stripped.to_string(), true),
            None => (key, false),
        };

        let explicit = property
            .as_object_mut()
            .and_then(|declared| declared.remove("required"))
            .and_then(|flag| flag.as_bool());

        if explicit.unwrap_or(!optional) {
            required.push(JsonValue::String(name.clone()));
        }
        normalized.insert(name, property);
    }
    *properties = normalized;

    if !required.is_empty() {
        object.insert("required".to_string(), JsonValue::Array(required));
    }

    Ok(json)
}

/// Renders a scalar YAML key or value as text (status codes are often plain integers).
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
