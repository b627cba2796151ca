//! Schema Inferencer: turns the JSON schema of a success response (or request body)
//! into the flat field map behind a Mongoose model.

use crate::error::{Result, ScaffoldError};
use crate::model::{MediaType, MethodSpec, ResponseSpec};
use log::debug;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::Value;

/// Storage type of a persisted field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    String,
}

/// Declaration of one persisted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub kind: FieldKind,
    pub required: bool,
    /// Whether the field carries a unique index
    pub indexed: bool,
}

/// Flat field-name to field-type map inferred from a JSON schema.
///
/// Field order is the property order of the source schema; create and update
/// fragments read request-body fields in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<(String, FieldDefinition)>,
}

impl FieldKind {
    /// Maps a JSON-schema type name; only `integer` and `number` are numeric.
    pub fn from_json_type(json_type: Option<&str>) -> Self {
        match json_type {
            Some("integer") | Some("number") => FieldKind::Number,
            _ => FieldKind::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Number => "Number",
            FieldKind::String => "String",
        }
    }
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, or replaces the definition if the name already exists.
    pub fn insert(&mut self, name: &str, definition: FieldDefinition) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = definition,
            None => self.fields.push((name.to_string(), definition)),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut FieldDefinition> {
        self.fields.iter_mut().find(|(n, _)| n == name).map(|(_, d)| d)
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Serializes as a Mongoose schema definition: `{ "type": "String", "index": { "unique": true }, "required": true }`.
impl Serialize for FieldDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct UniqueIndex {
            unique: bool,
        }

        let len = 1 + usize::from(self.indexed) + usize::from(self.required);
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", self.kind.as_str())?;
        if self.indexed {
            map.serialize_entry("index", &UniqueIndex { unique: true })?;
        }
        if self.required {
            map.serialize_entry("required", &true)?;
        }
        map.end()
    }
}

impl Serialize for FieldSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, definition) in &self.fields {
            map.serialize_entry(name, definition)?;
        }
        map.end()
    }
}

/// Converts a JSON schema into a [`FieldSchema`].
///
/// Returns `Ok(None)` when the schema's root type is not `object`. Each declared property
/// becomes a field; `integer` and `number` properties are numeric, everything else is
/// stored as a string. A property named `id` gets a unique index. Names listed in the
/// root `required` array (or properties carrying a draft-03 style `"required": true`)
/// are marked required.
///
/// # Errors
///
/// Returns [`ScaffoldError::MissingRequiredProperty`] when `required` names a property
/// that is not declared.
pub fn infer_field_schema(schema: &Value) -> Result<Option<FieldSchema>> {
    if schema.get("type").and_then(Value::as_str) != Some("object") {
        debug!("Schema root is not an object, skipping");
        return Ok(None);
    }

    let mut fields = FieldSchema::new();

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (name, property) in properties {
            let definition = FieldDefinition {
                kind: FieldKind::from_json_type(property_type(property)),
                required: property.get("required").and_then(Value::as_bool) == Some(true),
                indexed: name == "id",
            };
            fields.insert(name, definition);
        }
    }

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            let field = fields
                .get_mut(name)
                .ok_or_else(|| ScaffoldError::MissingRequiredProperty {
                    property: name.to_string(),
                })?;
            field.required = true;
        }
    }

    debug!("Inferred {} fields", fields.len());
    Ok(Some(fields))
}

/// Parses schema text and infers its fields. `context` names the schema's origin in errors.
pub fn infer_from_text(text: &str, context: &str) -> Result<Option<FieldSchema>> {
    let schema: Value =
        serde_json::from_str(text).map_err(|e| ScaffoldError::InvalidSchema {
            context: context.to_string(),
            message: e.to_string(),
        })?;
    infer_field_schema(&schema)
}

/// The declared type of a property. RAML type declarations may use the shorthand
/// `name: string`; JSON schema unions like `["integer", "null"]` use the first non-null type.
fn property_type(property: &Value) -> Option<&str> {
    match property {
        Value::String(shorthand) => Some(shorthand.as_str()),
        _ => match property.get("type")? {
            Value::String(declared) => Some(declared.as_str()),
            Value::Array(types) => types
                .iter()
                .filter_map(Value::as_str)
                .find(|t| *t != "null"),
            _ => None,
        },
    }
}

/// Selects the first media type whose content type ends in `json`.
pub fn select_json_media_type(body: &[MediaType]) -> Option<&MediaType> {
    body.iter().find(|media| media.content_type.ends_with("json"))
}

/// Selects the lowest-numbered 2xx response.
pub fn success_response(responses: &[ResponseSpec]) -> Option<&ResponseSpec> {
    responses
        .iter()
        .filter(|response| response.status.starts_with('2'))
        .min_by_key(|response| response.status.parse::<u16>().unwrap_or(u16::MAX))
}

/// Infers the persisted schema a method's success response declares.
///
/// Returns `Ok(None)` when there is no 2xx response, no JSON body, or no schema attached.
pub fn response_field_schema(method: &MethodSpec, context: &str) -> Result<Option<FieldSchema>> {
    let Some(response) = success_response(&method.responses) else {
        debug!("{}: no 2xx response", context);
        return Ok(None);
    };

    match select_json_media_type(&response.body).and_then(|media| media.schema.as_deref()) {
        Some(text) => infer_from_text(text, &format!("{} response {}", context, response.status)),
        None => {
            debug!("{}: response {} has no JSON schema", context, response.status);
            Ok(None)
        }
    }
}

/// Infers fields from the JSON request body of a POST, PUT or PATCH.
pub fn request_field_schema(method: &MethodSpec, context: &str) -> Result<Option<FieldSchema>> {
    if !method.verb.has_request_body() {
        return Ok(None);
    }

    match select_json_media_type(&method.body).and_then(|media| media.schema.as_deref()) {
        Some(text) => infer_from_text(text, &format!("{} request body", context)),
        None => Ok(None),
    }
}
