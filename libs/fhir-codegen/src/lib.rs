//! FHIR Code Generator
//!
//! Reads FHIR StructureDefinitions and generates strongly-typed Rust models
//! built on the `fhirbind-models` macros.
//!
//! ## Architecture
//!
//! The generator uses a three-stage pipeline:
//! 1. **Parser**: Extracts type information from FHIR StructureDefinitions
//! 2. **IR (Intermediate Representation)**: Language-agnostic type model
//! 3. **Generators**: Language-specific code generation from IR

pub mod generators;
pub mod ir;
pub mod parser;
pub mod utils;

use std::path::Path;

use anyhow::{Context, Result};
use fhirbind_models::conformance::StructureDefinition;
use generators::rust::RustGenerator;
use generators::GeneratorConfig;
use ir::TypeRegistry;

/// Main entry point for code generation
pub struct CodeGenerator {
    registry: TypeRegistry,
}

impl CodeGenerator {
    /// Create a code generator from a directory of StructureDefinition files
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let definitions = parser::load_definitions(dir)?;
        Self::from_definitions(&definitions)
    }

    /// Create a code generator from already loaded definitions
    pub fn from_definitions(definitions: &[StructureDefinition]) -> Result<Self> {
        let registry = parser::parse_definitions(definitions)?;
        Ok(Self { registry })
    }

    /// Get the type registry
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Generate code for a specific language
    pub fn generate<G: generators::Generator>(&self, generator: G) -> Result<G::Output> {
        generator.generate(&self.registry)
    }
}

/// Run the Rust code generator over a definitions directory.
///
/// Returns the number of generated modules.
pub fn generate_rust_from_dir(
    input_dir: &Path,
    output_dir: &Path,
    config: GeneratorConfig,
) -> Result<usize> {
    let codegen = CodeGenerator::from_dir(input_dir)
        .with_context(|| format!("building type registry from {}", input_dir.display()))?;

    let generator = RustGenerator::new(config);
    let output = codegen
        .generate(generator)
        .context("running Rust generator")?;

    utils::write_modules(output_dir, &output.modules)?;
    tracing::info!(
        modules = output.modules.len(),
        output = %output_dir.display(),
        "wrote generated modules"
    );

    Ok(output.modules.len())
}
