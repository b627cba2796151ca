//! RAML Scaffold - Command-line tool for generating server scaffolding from RAML.
//!
//! Reads a RAML API description and prints Express route handlers plus Mongoose
//! schemas inferred from the declared response bodies.
//!
//! # Usage
//!
//! ```bash
//! raml-scaffold [OPTIONS] <SPEC_FILE>
//! ```
//!
//! # Examples
//!
//! Print the scaffold to stdout:
//! ```bash
//! raml-scaffold api.raml
//! ```
//!
//! Write the scaffold to a file:
//! ```bash
//! raml-scaffold api.raml -o scaffold.js
//! ```
//!
//! Inspect the inferred schemas:
//! ```bash
//! raml-scaffold api.raml -f yaml
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use raml_scaffold::cli;

fn main() -> Result<()> {
    // Parse first so the verbose flag can pick the log level
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("RAML Scaffold starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    Ok(())
}
