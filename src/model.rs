//! In-memory shape of a loaded RAML document.
//!
//! The [`loader`](crate::loader) builds these types once per run; everything downstream
//! (walker, composer, assembler) only reads them.

use std::fmt;

/// A loaded API description: its metadata plus the top-level resources in source order.
#[derive(Debug, Clone, Default)]
pub struct ApiSpec {
    /// Value of the document's `title`, if declared
    pub title: Option<String>,
    /// Value of the document's `version`, if declared
    pub version: Option<String>,
    /// Top-level resources (`/products`, `/orders`, ...)
    pub resources: Vec<ResourceNode>,
}

/// One routable resource and everything nested below it.
#[derive(Debug, Clone, Default)]
pub struct ResourceNode {
    /// The mapping key as written in the document (e.g. "/products" or "/{id}")
    pub relative_uri: String,
    /// The pieces of `relative_uri` between slashes
    pub path_segments: Vec<PathSegment>,
    /// Declared methods, in source order
    pub methods: Vec<MethodSpec>,
    /// Nested resources, in source order
    pub children: Vec<ResourceNode>,
}

/// A single piece of a resource URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A literal segment such as `products`
    Literal(String),
    /// A `{name}` placeholder, stored without braces
    Parameter(String),
}

/// HTTP verbs the scaffold knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// One declared HTTP operation on a resource.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    pub verb: Verb,
    /// Request body media types; empty when the method declares no body
    pub body: Vec<MediaType>,
    /// Declared responses in source order
    pub responses: Vec<ResponseSpec>,
}

/// A declared response for one status code.
#[derive(Debug, Clone)]
pub struct ResponseSpec {
    /// Status code as written (e.g. "200")
    pub status: String,
    /// Response body media types; empty when no body is declared
    pub body: Vec<MediaType>,
}

/// A content-type entry of a request or response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    /// The content type key (e.g. "application/json")
    pub content_type: String,
    /// Raw JSON-schema text attached to this content type
    pub schema: Option<String>,
}

impl PathSegment {
    /// Classifies a raw segment: `{name}` is a parameter, anything else is literal.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => PathSegment::Parameter(name.to_string()),
            None => PathSegment::Literal(raw.to_string()),
        }
    }

    /// Splits a relative URI such as `/products/{id}` into its segments.
    pub fn split_uri(uri: &str) -> Vec<PathSegment> {
        uri.split('/')
            .filter(|s| !s.is_empty())
            .map(PathSegment::parse)
            .collect()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Literal(s) => write!(f, "{}", s),
            PathSegment::Parameter(s) => write!(f, "{{{}}}", s),
        }
    }
}

impl Verb {
    /// Maps a RAML method key to a verb. Returns `None` for keys the scaffold does not handle.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(Verb::Get),
            "post" => Some(Verb::Post),
            "put" => Some(Verb::Put),
            "patch" => Some(Verb::Patch),
            "delete" => Some(Verb::Delete),
            _ => None,
        }
    }

    /// Lowercase name, as used in `app.<verb>(...)`
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        }
    }

    /// Whether requests with this verb carry a body worth reading
    pub fn has_request_body(&self) -> bool {
        matches!(self, Verb::Post | Verb::Put | Verb::Patch)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl MethodSpec {
    /// Create a method with no body and no responses
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            body: Vec::new(),
            responses: Vec::new(),
        }
    }
}

impl MediaType {
    pub fn new(content_type: &str, schema: Option<String>) -> Self {
        Self {
            content_type: content_type.to_string(),
            schema,
        }
    }
}

impl ResourceNode {
    /// Create a resource with no methods or children
    pub fn new(relative_uri: &str) -> Self {
        Self {
            relative_uri: relative_uri.to_string(),
            path_segments: PathSegment::split_uri(relative_uri),
            methods: Vec::new(),
            children: Vec::new(),
        }
    }
}
