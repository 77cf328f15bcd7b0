//! Code generators for different programming languages
//!
//! Each language has its own module that implements the `Generator` trait.

pub mod rust;

use crate::ir::TypeRegistry;
use anyhow::Result;
use fhirbind_models::FhirVersion;
use serde::{Deserialize, Serialize};

/// Trait that all language generators must implement
pub trait Generator {
    /// The output type of this generator
    type Output;

    /// Generate code from the type registry
    fn generate(&self, registry: &TypeRegistry) -> Result<Self::Output>;
}

/// Configuration options for code generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Whether to generate documentation comments
    pub generate_docs: bool,
    /// Whether to generate a builder next to every struct
    pub generate_builders: bool,
    /// Whether primitive fields get a `_field` extension sidecar
    pub extension_sidecars: bool,
    /// Path of the models crate in generated code (`crate` when generating
    /// into the models crate itself)
    pub crate_path: String,
    /// Release of the generated `Resource` union; taken from the definitions
    /// when unset
    pub release: Option<FhirVersion>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            generate_docs: true,
            generate_builders: true,
            extension_sidecars: true,
            crate_path: "fhirbind_models".to_string(),
            release: None,
        }
    }
}
