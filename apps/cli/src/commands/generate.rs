use anyhow::{Context, Result};
use fhirbind_codegen::generators::GeneratorConfig;

use crate::cli::GenerateArgs;

/// Flags override the configured generator settings
pub fn apply_flags(mut config: GeneratorConfig, args: &GenerateArgs) -> GeneratorConfig {
    if args.no_docs {
        config.generate_docs = false;
    }
    if args.no_builders {
        config.generate_builders = false;
    }
    if let Some(release) = args.fhir_version {
        config.release = Some(release);
    }
    config
}

pub async fn run(args: &GenerateArgs, config: GeneratorConfig) -> Result<()> {
    let config = apply_flags(config, args);
    let input = args.input.clone();
    let output = args.output.clone();

    tracing::info!(input = %input.display(), output = %output.display(), "Generating models");
    let written = tokio::task::spawn_blocking(move || {
        fhirbind_codegen::generate_rust_from_dir(&input, &output, config)
    })
    .await
    .context("generator task failed")??;

    println!("Generated {} modules into {}", written, args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_win() {
        let args = GenerateArgs {
            input: PathBuf::from("defs"),
            output: PathBuf::from("out"),
            no_docs: true,
            no_builders: false,
            fhir_version: Some(fhirbind_models::FhirVersion::R4B),
        };
        let config = apply_flags(GeneratorConfig::default(), &args);
        assert!(!config.generate_docs);
        assert!(config.generate_builders);
        assert_eq!(config.release, Some(fhirbind_models::FhirVersion::R4B));
    }
}
