use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the scaffold pipeline
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Error types for loading a RAML document and generating code from it
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid RAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid RAML document: {0}")]
    InvalidSpec(String),

    #[error("invalid JSON schema for {context}: {message}")]
    InvalidSchema { context: String, message: String },

    #[error("cannot infer a resource name from path {path}")]
    UnnamedResource { path: String },

    #[error("required property `{property}` is not declared in the schema properties")]
    MissingRequiredProperty { property: String },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
