//! Joins the collected schemas and route fragments into the final scaffold text.

use crate::error::Result;
use crate::schema_inferencer::FieldSchema;
use crate::template::TemplateRenderer;
use crate::walker::{SchemaRegistry, ScaffoldState};
use log::debug;
use minijinja::context;
use serde::Serialize;

/// Opening line of the generated setup function
pub const HEADER: &str = "function setupScaffold(app) {\n";
/// Closing line of the generated setup function
pub const FOOTER: &str = "}\n";

/// Order of schema declarations in the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaOrder {
    /// First-discovered schema first
    #[default]
    Discovery,
    /// Most recently discovered schema first, matching the output of earlier scaffold releases
    Legacy,
}

/// Options that shape the assembled output
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub schema_order: SchemaOrder,
}

/// Output assembler - places schema declarations ahead of the route fragments and
/// wraps everything in the setup function.
pub struct OutputAssembler<'a> {
    templates: &'a TemplateRenderer,
    options: GenerateOptions,
}

impl<'a> OutputAssembler<'a> {
    pub fn new(templates: &'a TemplateRenderer, options: GenerateOptions) -> Self {
        Self { templates, options }
    }

    /// Builds the final output lines: header, schema declarations, fragments, footer.
    pub fn assemble(&self, state: ScaffoldState) -> Result<Vec<String>> {
        debug!(
            "Assembling {} schemas and {} fragments",
            state.schemas.len(),
            state.fragments.len()
        );

        let mut output = Vec::with_capacity(state.schemas.len() + state.fragments.len() + 2);
        output.push(HEADER.to_string());
        output.extend(self.declarations(&state.schemas)?);
        output.extend(state.fragments);
        output.push(FOOTER.to_string());

        Ok(output)
    }

    fn declarations(&self, schemas: &SchemaRegistry) -> Result<Vec<String>> {
        let mut declarations = schemas
            .iter()
            .map(|(name, schema)| self.schema_declaration(name, schema))
            .collect::<Result<Vec<_>>>()?;

        if self.options.schema_order == SchemaOrder::Legacy {
            declarations.reverse();
        }

        Ok(declarations)
    }

    /// Renders the `Schema` and model declarations for one resource.
    pub fn schema_declaration(&self, name: &str, schema: &FieldSchema) -> Result<String> {
        let definition = to_pretty_json(schema)?;
        self.templates.render(
            "schema.js",
            context! {
                model => name,
                definition => definition,
            },
        )
    }
}

/// Pretty JSON with four-space indentation
fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_inferencer::infer_from_text;
    use pretty_assertions::assert_eq;

    fn schema(text: &str) -> FieldSchema {
        infer_from_text(text, "test").unwrap().unwrap()
    }

    fn state() -> ScaffoldState {
        let mut state = ScaffoldState::new();
        state.schemas.register(
            "Product",
            schema(r#"{"type":"object","properties":{"id":{"type":"string"},"qty":{"type":"integer"}},"required":["id"]}"#),
        );
        state
            .schemas
            .register("Order", schema(r#"{"type":"object"}"#));
        state.fragments.push("  app.get('/products', ...);".to_string());
        state.fragments.push("  app.get('/orders', ...);".to_string());
        state
    }

    #[test]
    fn test_schema_declaration_text() {
        let templates = TemplateRenderer::new().unwrap();
        let assembler = OutputAssembler::new(&templates, GenerateOptions::default());
        let declaration = assembler
            .schema_declaration(
                "Product",
                &schema(r#"{"type":"object","properties":{"id":{"type":"string"},"qty":{"type":"integer"}},"required":["id"]}"#),
            )
            .unwrap();

        let expected = r#"  var Product = new Schema({
    "id": {
        "type": "String",
        "index": {
            "unique": true
        },
        "required": true
    },
    "qty": {
        "type": "Number"
    }
}, { _id: false }  );
  var ProductModel = mongoose.model("Product", Product);"#;
        assert_eq!(declaration, expected);
    }

    #[test]
    fn test_empty_schema_declaration() {
        let templates = TemplateRenderer::new().unwrap();
        let assembler = OutputAssembler::new(&templates, GenerateOptions::default());
        let declaration = assembler
            .schema_declaration("Order", &FieldSchema::new())
            .unwrap();
        assert!(declaration.starts_with("  var Order = new Schema({}, { _id: false }  );"));
    }

    #[test]
    fn test_declarations_before_fragments() {
        let templates = TemplateRenderer::new().unwrap();
        let output = OutputAssembler::new(&templates, GenerateOptions::default())
            .assemble(state())
            .unwrap();

        assert_eq!(output.len(), 6);
        assert_eq!(output[0], HEADER);
        assert!(output[1].starts_with("  var Product = "));
        assert!(output[2].starts_with("  var Order = "));
        assert_eq!(output[3], "  app.get('/products', ...);");
        assert_eq!(output[4], "  app.get('/orders', ...);");
        assert_eq!(output[5], FOOTER);
    }

    #[test]
    fn test_legacy_order_reverses_declarations() {
        let templates = TemplateRenderer::new().unwrap();
        let options = GenerateOptions {
            schema_order: SchemaOrder::Legacy,
        };
        let output = OutputAssembler::new(&templates, options)
            .assemble(state())
            .unwrap();

        assert!(output[1].starts_with("  var Order = "));
        assert!(output[2].starts_with("  var Product = "));
        assert_eq!(output[3], "  app.get('/products', ...);");
    }

    #[test]
    fn test_empty_state_is_just_the_wrapper() {
        let templates = TemplateRenderer::new().unwrap();
        let output = OutputAssembler::new(&templates, GenerateOptions::default())
            .assemble(ScaffoldState::new())
            .unwrap();
        assert_eq!(output, vec![HEADER.to_string(), FOOTER.to_string()]);
    }
}
