//! Route Composer: one Express route fragment per declared method.

use crate::error::Result;
use crate::model::{MethodSpec, PathSegment, Verb};
use crate::naming::infer_resource_name;
use crate::route::{filter_from_pattern, to_route_pattern};
use crate::schema_inferencer::{request_field_schema, response_field_schema, FieldSchema};
use crate::template::TemplateRenderer;
use log::debug;
use minijinja::context;

/// Route composer - turns one declared method into one route-registration fragment
pub struct RouteComposer {
    templates: TemplateRenderer,
}

/// Everything produced for a single method
#[derive(Debug, Clone)]
pub struct ComposedRoute {
    pub verb: Verb,
    /// Route pattern with `:name` parameters
    pub route_pattern: String,
    /// Model name inferred from the resource path
    pub resource_name: String,
    /// Generated code; `None` for verbs that generate nothing (PATCH)
    pub fragment: Option<String>,
    /// Schema inferred from the success response, if any
    pub schema: Option<FieldSchema>,
}

impl RouteComposer {
    /// Create a new RouteComposer with the embedded templates
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: TemplateRenderer::new()?,
        })
    }

    /// The renderer shared with the output assembler
    pub fn templates(&self) -> &TemplateRenderer {
        &self.templates
    }

    /// Compose the fragment for a method declared at `absolute_uri`.
    ///
    /// The schema inferred from the method's success response is returned alongside the
    /// fragment so the caller can register it. When the response declares no schema,
    /// write verbs fall back to the request body's schema for the fields they copy; that
    /// fallback is never returned as the method's schema.
    pub fn compose_method(
        &self,
        absolute_uri: &str,
        method: &MethodSpec,
        segments: &[PathSegment],
    ) -> Result<ComposedRoute> {
        let resource_name = infer_resource_name(segments)?;
        let route_pattern = to_route_pattern(absolute_uri);
        let context = format!("{} {}", method.verb, absolute_uri);

        debug!("Composing {} as {}", context, resource_name);

        let schema = response_field_schema(method, &context)?;
        let request_fields = match schema {
            Some(_) => None,
            None => request_field_schema(method, &context)?,
        };
        let fields = schema.as_ref().or(request_fields.as_ref());

        let fragment = self.compose(method.verb, &route_pattern, &resource_name, fields)?;

        Ok(ComposedRoute {
            verb: method.verb,
            route_pattern,
            resource_name,
            fragment,
            schema,
        })
    }

    /// Dispatch to the per-verb composer
    pub fn compose(
        &self,
        verb: Verb,
        route_pattern: &str,
        resource_name: &str,
        fields: Option<&FieldSchema>,
    ) -> Result<Option<String>> {
        match verb {
            Verb::Get => self.compose_get(route_pattern, resource_name).map(Some),
            Verb::Post => self
                .compose_post(route_pattern, resource_name, fields)
                .map(Some),
            Verb::Put => self
                .compose_put(route_pattern, resource_name, fields)
                .map(Some),
            Verb::Patch => Ok(None),
            Verb::Delete => self.compose_delete(route_pattern, resource_name).map(Some),
        }
    }

    /// List records, filtered by the route's last path parameter when there is one
    fn compose_get(&self, route_pattern: &str, resource_name: &str) -> Result<String> {
        self.templates.render(
            "get.js",
            context! {
                uri => route_pattern,
                model => resource_name,
                filter => filter_argument(route_pattern),
            },
        )
    }

    /// Create a record from the request body
    fn compose_post(
        &self,
        route_pattern: &str,
        resource_name: &str,
        fields: Option<&FieldSchema>,
    ) -> Result<String> {
        self.templates.render(
            "post.js",
            context! {
                uri => route_pattern,
                model => resource_name,
                fields => field_names(fields),
            },
        )
    }

    /// Load one record, overwrite its fields from the request body, save it
    fn compose_put(
        &self,
        route_pattern: &str,
        resource_name: &str,
        fields: Option<&FieldSchema>,
    ) -> Result<String> {
        self.templates.render(
            "put.js",
            context! {
                uri => route_pattern,
                model => resource_name,
                filter => filter_argument(route_pattern),
                fields => field_names(fields),
            },
        )
    }

    /// Load one record and remove it
    fn compose_delete(&self, route_pattern: &str, resource_name: &str) -> Result<String> {
        self.templates.render(
            "delete.js",
            context! {
                uri => route_pattern,
                model => resource_name,
                filter => filter_argument(route_pattern),
            },
        )
    }
}

/// The filter as the leading argument of `find`/`findOne`, or nothing
fn filter_argument(route_pattern: &str) -> String {
    filter_from_pattern(route_pattern)
        .map(|filter| format!("{}, ", filter))
        .unwrap_or_default()
}

fn field_names(fields: Option<&FieldSchema>) -> Vec<&str> {
    fields.map(FieldSchema::field_names).unwrap_or_default()
}
