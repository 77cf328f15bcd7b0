//! Round-trip check of a resource against a release's models

use anyhow::{Context, Result};
use fhirbind_models::model::FhirModel;
use fhirbind_models::resource::ResourceUnion;
use fhirbind_models::{r4, r4b, r5, FhirVersion};
use serde_json::Value;
use std::fmt;

use crate::cli::CheckArgs;

/// How a member differs after the round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Present in the input, gone from the output
    Dropped(String),
    /// Absent from the input, present in the output
    Added(String),
    /// Present in both with different values
    Changed(String),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Dropped(path) => write!(f, "dropped  {}", path),
            Mismatch::Added(path) => write!(f, "added    {}", path),
            Mismatch::Changed(path) => write!(f, "changed  {}", path),
        }
    }
}

#[derive(Debug)]
pub struct CheckReport {
    pub resource_type: String,
    /// Whether a typed model handled the resource
    pub modeled: bool,
    pub mismatches: Vec<Mismatch>,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

pub async fn run(args: &CheckArgs) -> Result<bool> {
    let text = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let input: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing JSON in {}", args.file.display()))?;

    let report = check(args.fhir_version, &input)?;
    if !report.modeled {
        tracing::warn!(
            resource_type = %report.resource_type,
            release = %args.fhir_version,
            "resource type has no typed model; checked as raw JSON"
        );
    }

    if report.passed() {
        println!(
            "{} ({}): round trip ok",
            report.resource_type, args.fhir_version
        );
    } else {
        println!(
            "{} ({}): {} member(s) did not round-trip",
            report.resource_type,
            args.fhir_version,
            report.mismatches.len()
        );
        for mismatch in &report.mismatches {
            println!("  {}", mismatch);
        }
    }
    Ok(report.passed())
}

/// Parse into the release's `Resource` union and compare the re-serialized form.
///
/// R4B shares the R4 union, so messages name `release` rather than the
/// union's own `RELEASE`.
pub fn check(release: FhirVersion, input: &Value) -> Result<CheckReport> {
    match release {
        FhirVersion::R4 => check_with::<r4::Resource>(release, input),
        FhirVersion::R4B => check_with::<r4b::Resource>(release, input),
        FhirVersion::R5 => check_with::<r5::Resource>(release, input),
    }
}

fn check_with<R: ResourceUnion>(release: FhirVersion, input: &Value) -> Result<CheckReport> {
    let resource = R::from_value(input.clone())
        .with_context(|| format!("parsing resource as {}", release))?;
    let output = resource.to_json().context("serializing resource")?;

    let mut mismatches = Vec::new();
    diff("", input, &output, &mut mismatches);
    tracing::debug!(
        %release,
        resource_type = resource.resource_type(),
        mismatches = mismatches.len(),
        "round trip compared"
    );

    Ok(CheckReport {
        resource_type: resource.resource_type().to_string(),
        modeled: resource.is_modeled(),
        mismatches,
    })
}

/// Collect differing member paths (`entry[0].resource.name`)
pub fn diff(path: &str, expected: &Value, actual: &Value, out: &mut Vec<Mismatch>) {
    match (expected, actual) {
        (Value::Object(left), Value::Object(right)) => {
            for (key, value) in left {
                let child = join(path, key);
                match right.get(key) {
                    Some(other) => diff(&child, value, other, out),
                    None => out.push(Mismatch::Dropped(child)),
                }
            }
            for key in right.keys().filter(|k| !left.contains_key(*k)) {
                out.push(Mismatch::Added(join(path, key)));
            }
        }
        (Value::Array(left), Value::Array(right)) if left.len() == right.len() => {
            for (i, (l, r)) in left.iter().zip(right).enumerate() {
                diff(&format!("{}[{}]", path, i), l, r, out);
            }
        }
        _ if expected == actual => {}
        _ => out.push(Mismatch::Changed(root_or(path))),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn root_or(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diff_reports_paths() {
        let expected = json!({
            "resourceType": "Patient",
            "name": [{"family": "Chalmers", "given": ["Peter"]}],
            "active": true
        });
        let actual = json!({
            "resourceType": "Patient",
            "name": [{"family": "Chalmers", "given": ["Pete"]}],
            "gender": "male"
        });

        let mut out = Vec::new();
        diff("", &expected, &actual, &mut out);
        assert_eq!(
            out,
            vec![
                Mismatch::Changed("name[0].given[0]".into()),
                Mismatch::Dropped("active".into()),
                Mismatch::Added("gender".into()),
            ]
        );
    }

    #[test]
    fn test_diff_array_length() {
        let mut out = Vec::new();
        diff("", &json!({"a": [1, 2]}), &json!({"a": [1]}), &mut out);
        assert_eq!(out, vec![Mismatch::Changed("a".into())]);
    }

    #[test]
    fn test_check_patient_round_trips() {
        let input = json!({
            "resourceType": "Patient",
            "id": "example",
            "active": true,
            "_active": {"extension": [{"url": "http://example.org/flag", "valueBoolean": true}]},
            "name": [{"use": "official", "family": "Chalmers", "given": ["Peter", "James"]}],
            "birthDate": "1974-12-25",
            "deceasedBoolean": false
        });
        for release in [FhirVersion::R4, FhirVersion::R4B, FhirVersion::R5] {
            let report = check(release, &input).unwrap();
            assert!(report.modeled);
            assert!(report.passed(), "{:?}", report.mismatches);
        }
    }

    #[test]
    fn test_check_unmodeled_resource_is_kept_raw() {
        let input = json!({"resourceType": "Basic", "id": "b1", "code": {"text": "note"}});
        let report = check(FhirVersion::R4, &input).unwrap();
        assert!(!report.modeled);
        assert!(report.passed());
    }

    #[test]
    fn test_parse_error_names_requested_release() {
        let input = json!({"resourceType": "Patient", "active": "yes"});
        for release in [FhirVersion::R4, FhirVersion::R4B, FhirVersion::R5] {
            let err = check(release, &input).unwrap_err();
            assert_eq!(err.to_string(), format!("parsing resource as {}", release));
        }
    }

    #[test]
    fn test_check_keeps_decimal_text() {
        let input: Value = serde_json::from_str(
            r#"{"resourceType": "Observation", "status": "final", "code": {"text": "hr"},
                "valueQuantity": {"value": 1.50, "unit": "1"}}"#,
        )
        .unwrap();
        let report = check(FhirVersion::R4, &input).unwrap();
        assert!(report.passed(), "{:?}", report.mismatches);
    }

    #[test]
    fn test_check_rejects_non_resource() {
        assert!(check(FhirVersion::R5, &json!({"id": "x"})).is_err());
    }
}
