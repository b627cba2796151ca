//! Resource Tree Walker: depth-first traversal that collects route fragments and
//! registers inferred schemas by resource name.

use crate::composer::RouteComposer;
use crate::error::Result;
use crate::model::{PathSegment, ResourceNode};
use crate::schema_inferencer::FieldSchema;
use log::debug;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Inferred schemas keyed by resource name.
///
/// Entries keep the position of their first registration; registering a name again
/// replaces its schema (last writer wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    entries: Vec<(String, FieldSchema)>,
}

/// Run state of one generation pass: fragments in traversal order plus the schema registry
#[derive(Debug, Default)]
pub struct ScaffoldState {
    pub fragments: Vec<String>,
    pub schemas: SchemaRegistry,
}

/// Walks a resource tree and composes a fragment for every method it declares.
pub struct ResourceWalker<'a> {
    composer: &'a RouteComposer,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `name`. Returns `true` if an earlier schema was replaced.
    pub fn register(&mut self, name: &str, schema: FieldSchema) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => {
                *existing = schema;
                true
            }
            None => {
                self.entries.push((name.to_string(), schema));
                false
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Entries in first-registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SchemaRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, schema) in &self.entries {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl ScaffoldState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> ResourceWalker<'a> {
    pub fn new(composer: &'a RouteComposer) -> Self {
        Self { composer }
    }

    /// Visits `node` and its descendants depth-first.
    ///
    /// `prefix_segments` and `prefix_uri` describe the path of the node's parent. A node's
    /// methods are composed before any of its children are visited, and children are
    /// visited in declaration order.
    pub fn walk(
        &self,
        node: &ResourceNode,
        prefix_segments: &[PathSegment],
        prefix_uri: &str,
        state: &mut ScaffoldState,
    ) -> Result<()> {
        let absolute_uri = format!("{}{}", prefix_uri, node.relative_uri);
        let absolute_segments: Vec<PathSegment> = prefix_segments
            .iter()
            .chain(node.path_segments.iter())
            .cloned()
            .collect();

        debug!(
            "Visiting {} ({} methods, {} children)",
            absolute_uri,
            node.methods.len(),
            node.children.len()
        );

        for method in &node.methods {
            let route = self
                .composer
                .compose_method(&absolute_uri, method, &absolute_segments)?;

            if let Some(fragment) = route.fragment {
                state.fragments.push(fragment);
            }

            if let Some(schema) = route.schema {
                if let Some(previous) = state.schemas.get(&route.resource_name) {
                    debug!(
                        "{} {} replaces the {} schema {:?} with {:?}",
                        route.verb,
                        route.route_pattern,
                        route.resource_name,
                        previous.field_names(),
                        schema.field_names()
                    );
                }
                state.schemas.register(&route.resource_name, schema);
            }
        }

        for child in &node.children {
            self.walk(child, &absolute_segments, &absolute_uri, state)?;
        }

        Ok(())
    }

    /// Walks every top-level resource from the root path.
    pub fn walk_all(&self, resources: &[ResourceNode], state: &mut ScaffoldState) -> Result<()> {
        for resource in resources {
            self.walk(resource, &[], "", state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MediaType, MethodSpec, ResponseSpec, Verb};
    use crate::schema_inferencer::infer_from_text;

    fn method(verb: Verb, status: &str, schema: Option<&str>) -> MethodSpec {
        let mut method = MethodSpec::new(verb);
        method.responses.push(ResponseSpec {
            status: status.to_string(),
            body: vec![MediaType::new("application/json", schema.map(String::from))],
        });
        method
    }

    fn node(uri: &str, methods: Vec<MethodSpec>, children: Vec<ResourceNode>) -> ResourceNode {
        let mut node = ResourceNode::new(uri);
        node.methods = methods;
        node.children = children;
        node
    }

    fn route_of(fragment: &str) -> &str {
        fragment
            .split('\'')
            .nth(1)
            .unwrap_or_default()
    }

    #[test]
    fn test_parent_before_children_in_order() {
        let tree = node(
            "/stores",
            vec![MethodSpec::new(Verb::Get)],
            vec![
                node("/{storeId}", vec![MethodSpec::new(Verb::Get)], vec![]),
                node("/open", vec![MethodSpec::new(Verb::Get)], vec![]),
            ],
        );

        let composer = RouteComposer::new().unwrap();
        let mut state = ScaffoldState::new();
        ResourceWalker::new(&composer)
            .walk(&tree, &[], "", &mut state)
            .unwrap();

        let routes: Vec<&str> = state.fragments.iter().map(|f| route_of(f)).collect();
        assert_eq!(routes, vec!["/stores", "/stores/:storeId", "/stores/open"]);
    }

    #[test]
    fn test_paths_accumulate_through_nesting() {
        let tree = node(
            "/stores",
            vec![],
            vec![node(
                "/{storeId}",
                vec![],
                vec![node(
                    "/products",
                    vec![],
                    vec![node("/{id}", vec![MethodSpec::new(Verb::Delete)], vec![])],
                )],
            )],
        );

        let composer = RouteComposer::new().unwrap();
        let mut state = ScaffoldState::new();
        ResourceWalker::new(&composer)
            .walk_all(&[tree], &mut state)
            .unwrap();

        assert_eq!(state.fragments.len(), 1);
        let fragment = &state.fragments[0];
        assert_eq!(route_of(fragment), "/stores/:storeId/products/:id");
        assert!(fragment.contains("ProductModel.findOne({ id: req.params.id }, "));
    }

    #[test]
    fn test_schema_registered_under_resource_name() {
        let schema = r#"{"type":"object","properties":{"id":{"type":"string"}}}"#;
        let tree = node(
            "/products",
            vec![method(Verb::Get, "200", Some(schema))],
            vec![node("/{id}", vec![method(Verb::Get, "404", None)], vec![])],
        );

        let composer = RouteComposer::new().unwrap();
        let mut state = ScaffoldState::new();
        ResourceWalker::new(&composer)
            .walk(&tree, &[], "", &mut state)
            .unwrap();

        assert_eq!(state.schemas.names(), vec!["Product"]);
        assert_eq!(
            state.schemas.get("Product"),
            infer_from_text(schema, "test").unwrap().as_ref()
        );
        assert_eq!(state.fragments.len(), 2);
    }

    #[test]
    fn test_last_registration_wins() {
        let first = r#"{"type":"object","properties":{"a":{"type":"string"}}}"#;
        let second = r#"{"type":"object","properties":{"b":{"type":"string"}}}"#;
        let tree = node(
            "/items",
            vec![
                method(Verb::Get, "200", Some(first)),
                method(Verb::Post, "201", Some(second)),
            ],
            vec![],
        );

        let composer = RouteComposer::new().unwrap();
        let mut state = ScaffoldState::new();
        ResourceWalker::new(&composer)
            .walk(&tree, &[], "", &mut state)
            .unwrap();

        assert_eq!(state.schemas.len(), 1);
        assert_eq!(state.schemas.get("Item").unwrap().field_names(), vec!["b"]);
    }

    #[test]
    fn test_patch_adds_no_fragment() {
        let tree = node(
            "/items",
            vec![MethodSpec::new(Verb::Patch), MethodSpec::new(Verb::Get)],
            vec![],
        );

        let composer = RouteComposer::new().unwrap();
        let mut state = ScaffoldState::new();
        ResourceWalker::new(&composer)
            .walk(&tree, &[], "", &mut state)
            .unwrap();

        assert_eq!(state.fragments.len(), 1);
        assert!(state.fragments[0].starts_with("  app.get("));
    }

    #[test]
    fn test_registry_keeps_first_position() {
        let mut registry = SchemaRegistry::new();
        assert!(!registry.register("A", FieldSchema::new()));
        assert!(!registry.register("B", FieldSchema::new()));
        assert!(registry.register("A", FieldSchema::new()));
        assert_eq!(registry.names(), vec!["A", "B"]);
    }

    #[test]
    fn test_parameter_only_resource_with_methods_fails() {
        let tree = node("/{id}", vec![MethodSpec::new(Verb::Get)], vec![]);
        let composer = RouteComposer::new().unwrap();
        let mut state = ScaffoldState::new();
        let result = ResourceWalker::new(&composer).walk(&tree, &[], "", &mut state);
        assert!(result.is_err());
    }
}
