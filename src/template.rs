//! Code fragment templates.
//!
//! Every generated fragment comes from a `minijinja` template under `templates/`, embedded
//! into the binary at compile time. Substitution is literal: auto-escaping is switched
//! off because the output is JavaScript source, not markup.

use crate::error::Result;
use log::debug;
use minijinja::{AutoEscape, Environment};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("get.js", include_str!("../templates/get.js")),
    ("post.js", include_str!("../templates/post.js")),
    ("put.js", include_str!("../templates/put.js")),
    ("delete.js", include_str!("../templates/delete.js")),
    ("schema.js", include_str!("../templates/schema.js")),
];

/// Renders the embedded fragment templates.
pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Compiles all embedded templates.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to compile.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        debug!("Compiled {} templates", TEMPLATES.len());

        Ok(Self { env })
    }

    /// Renders the named template with `context`.
    pub fn render<S: Serialize>(&self, name: &str, context: S) -> Result<String> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_substitution_is_not_escaped() {
        let renderer = TemplateRenderer::new().unwrap();
        let output = renderer
            .render(
                "get.js",
                context! { uri => "/a/:b", model => "A", filter => "{ b: req.params.b }, " },
            )
            .unwrap();
        assert!(output.contains("app.get('/a/:b'"));
        assert!(output.contains("AModel.find({ b: req.params.b }, function (err, items) {"));
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let renderer = TemplateRenderer::new().unwrap();
        assert!(renderer.render("patch.js", context! {}).is_err());
    }

    #[test]
    fn test_field_loop_separates_with_commas() {
        let renderer = TemplateRenderer::new().unwrap();
        let output = renderer
            .render(
                "post.js",
                context! { uri => "/a", model => "A", fields => vec!["x", "y"] },
            )
            .unwrap();
        assert!(output.contains("        x: req.body.x,\n        y: req.body.y\n    });"));
    }
}
