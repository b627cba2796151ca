//! RAML Scaffold - server scaffolding generated from a RAML API description.
//!
//! This library turns a RAML resource tree into Express route handlers and Mongoose
//! schema declarations. It is a small source-to-source compiler: the input is a typed
//! resource tree, the output is text.
//!
//! # Architecture
//!
//! 1. [`loader`] - Reads a RAML document into a [`model::ApiSpec`] resource tree
//! 2. [`schema_inferencer`] - Infers persisted field types from response JSON schemas
//! 3. [`naming`] - Derives model names from resource paths
//! 4. [`route`] - Translates URIs into route patterns and lookup filters
//! 5. [`composer`] - Renders one route fragment per declared method
//! 6. [`walker`] - Traverses the tree, collecting fragments and schemas
//! 7. [`assembler`] - Orders schema declarations before routes and wraps the result
//! 8. [`serializer`] - Writes the output to stdout or a file
//!
//! # Example Usage
//!
//! ```no_run
//! use raml_scaffold::{
//!     assembler::GenerateOptions,
//!     loader::SpecLoader,
//!     scaffold::Scaffold,
//! };
//! use std::path::Path;
//!
//! let spec = SpecLoader::load_file(Path::new("api.raml")).unwrap();
//! let scaffold = Scaffold::new(GenerateOptions::default()).unwrap();
//! for line in scaffold.generate(&spec).unwrap() {
//!     println!("{}", line);
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod assembler;
pub mod cli;
pub mod composer;
pub mod error;
pub mod loader;
pub mod model;
pub mod naming;
pub mod route;
pub mod scaffold;
pub mod schema_inferencer;
pub mod serializer;
pub mod template;
pub mod walker;
