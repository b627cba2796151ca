use crate::assembler::{GenerateOptions, SchemaOrder};
use crate::loader::SpecLoader;
use crate::scaffold::Scaffold;
use crate::serializer::{render_lines, serialize_json, serialize_yaml, write_to_file};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// RAML Scaffold - Generate Express routes and Mongoose schemas from a RAML API description
#[derive(Parser, Debug)]
#[command(name = "raml-scaffold")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the RAML specification file
    #[arg(value_name = "SPEC_FILE")]
    pub spec_path: PathBuf,

    /// Output format (js for scaffold code, json or yaml for the inferred schemas)
    #[arg(short = 'f', long = "format", value_enum, default_value = "js")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Emit schema declarations most-recently-discovered first
    #[arg(long = "legacy-order")]
    pub legacy_order: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Express route handlers and Mongoose schemas
    Js,
    /// Inferred schemas as JSON
    Json,
    /// Inferred schemas as YAML
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.spec_path.exists() {
        anyhow::bail!("Spec file does not exist: {}", args.spec_path.display());
    }

    if !args.spec_path.is_file() {
        anyhow::bail!("Spec path is not a file: {}", args.spec_path.display());
    }

    info!("Spec file: {}", args.spec_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

impl CliArgs {
    /// Library options derived from the command line
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            schema_order: if self.legacy_order {
                SchemaOrder::Legacy
            } else {
                SchemaOrder::Discovery
            },
        }
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    // Step 1: Load the RAML document
    info!("Loading RAML spec...");
    let spec = SpecLoader::load_file(&args.spec_path)
        .context("There was an error with the RAML spec")?;

    info!(
        "Loaded {} ({} top-level resources)",
        spec.title.as_deref().unwrap_or("untitled API"),
        spec.resources.len()
    );

    if spec.resources.is_empty() {
        log::warn!("No resources found in the spec");
    }

    // Step 2: Walk the resource tree
    let scaffold = Scaffold::new(args.generate_options())?;

    // Step 3: Render the requested output
    let content = match args.output_format {
        OutputFormat::Js => render_lines(&scaffold.generate(&spec)?),
        OutputFormat::Json => serialize_json(&scaffold.collect(&spec)?.schemas)?,
        OutputFormat::Yaml => serialize_yaml(&scaffold.collect(&spec)?.schemas)?,
    };

    // Step 4: Output to file or stdout
    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
    } else {
        print!("{}", content);
    }

    info!("Generation complete!");
    Ok(())
}
