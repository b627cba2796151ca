//! URI pattern translation and path-parameter lookup filters.

use std::fmt;

/// A single-field equality lookup bound to a request path parameter.
///
/// Renders as the object literal handed to the model's `find`/`findOne`:
/// `{ id: req.params.id }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Name of the path parameter (and of the model field it is matched against)
    pub parameter: String,
}

/// Rewrites RAML placeholders into route parameters: `/products/{id}` becomes `/products/:id`.
///
/// Every `{` turns into `:` and every `}` is dropped; nothing else in the URI is touched.
pub fn to_route_pattern(uri: &str) -> String {
    uri.replace('}', "").replace('{', ":")
}

/// Lists the `:name` parameters of a route pattern, in path order.
///
/// Only parameters that start a path segment count, as in `/a/:b`.
pub fn route_parameters(pattern: &str) -> Vec<&str> {
    pattern
        .split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Builds the lookup filter for a route pattern from its last path parameter.
///
/// The innermost parameter identifies the record a single-record operation acts on,
/// so `/stores/:storeId/products/:id` filters on `id`. Returns `None` for patterns
/// without parameters.
pub fn filter_from_pattern(pattern: &str) -> Option<Filter> {
    route_parameters(pattern).last().map(|name| Filter {
        parameter: name.to_string(),
    })
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {}: req.params.{} }}", self.parameter, self.parameter)
    }
}
