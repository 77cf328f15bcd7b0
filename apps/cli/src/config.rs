//! CLI configuration
//!
//! Values come from an optional `fhirbind.toml` and `FHIRBIND__*` environment
//! variables (`FHIRBIND__LOGGING__LEVEL=debug`,
//! `FHIRBIND__GENERATOR__GENERATE_DOCS=false`). Command-line flags are applied
//! on top by the caller.

use anyhow::{Context, Result};
use fhirbind_codegen::generators::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_FILE: &str = "fhirbind";
const ENV_PREFIX: &str = "FHIRBIND";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub logging: LoggingConfig,
    pub generator: GeneratorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for fhirbind crates when RUST_LOG is unset
    pub level: String,
    /// JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl CliConfig {
    /// Load configuration. An explicit file must exist; the default one is optional.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_FILE).required(false),
        };

        config::Config::builder()
            .add_source(source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to build config")?
            .try_deserialize::<Self>()
            .context("failed to deserialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhirbind_models::FhirVersion;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
        assert!(config.generator.generate_builders);
        assert_eq!(config.generator.crate_path, "fhirbind_models");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fhirbind.toml");
        fs::write(
            &path,
            r#"
[logging]
level = "debug"
json = true

[generator]
generate_docs = false
crate_path = "crate"
release = "R4"
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(!config.generator.generate_docs);
        assert!(config.generator.generate_builders);
        assert_eq!(config.generator.crate_path, "crate");
        assert_eq!(config.generator.release, Some(FhirVersion::R4));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
