use clap::{Parser, Subcommand};
use fhirbind_models::FhirVersion;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fhirbind")]
#[command(about = "Generate and check typed FHIR models")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./fhirbind.toml when present)
    #[arg(short, long, global = true, env = "FHIRBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate Rust models from StructureDefinitions
    Generate(GenerateArgs),
    /// Check that a resource survives a parse/serialize round trip
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Directory of StructureDefinition JSON files (single resources or Bundles)
    #[arg(short, long)]
    pub input: PathBuf,
    /// Directory receiving the generated modules
    #[arg(short, long)]
    pub output: PathBuf,
    /// Skip doc comments
    #[arg(long)]
    pub no_docs: bool,
    /// Skip builders
    #[arg(long)]
    pub no_builders: bool,
    /// Release of the generated Resource union (taken from the definitions by default)
    #[arg(long)]
    pub fhir_version: Option<FhirVersion>,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// JSON resource to check
    pub file: PathBuf,
    /// Release whose models are used (r4, r4b, r5)
    #[arg(long, default_value_t = FhirVersion::R5)]
    pub fhir_version: FhirVersion,
}
