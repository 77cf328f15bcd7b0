//! Every fixture under tests/data must survive parse → serialize unchanged

use fhirbind_models::prelude::*;
use fhirbind_models::{r4, r5};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures(release: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(release);
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", dir.display(), e))
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "no fixtures in {}", dir.display());
    paths
}

fn load(path: &Path) -> Value {
    let text = fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn assert_roundtrip<R: ResourceUnion>(release: &str) {
    for path in fixtures(release) {
        let json = load(&path);
        let resource = R::from_value(json.clone())
            .unwrap_or_else(|e| panic!("{}: {}", path.display(), e));

        assert!(
            resource.is_modeled(),
            "{}: {} parsed as raw JSON",
            path.display(),
            resource.resource_type()
        );
        assert_eq!(
            resource.to_json().unwrap(),
            json,
            "{} did not round-trip",
            path.display()
        );
    }
}

#[test]
fn test_r4_fixtures_roundtrip() {
    assert_roundtrip::<r4::Resource>("r4");
}

#[test]
fn test_r5_fixtures_roundtrip() {
    assert_roundtrip::<r5::Resource>("r5");
}

#[test]
fn test_r4b_shares_r4_models() {
    for path in fixtures("r4") {
        let json = load(&path);
        let resource = fhirbind_models::r4b::Resource::from_value(json.clone()).unwrap();
        assert_eq!(resource.into_value().unwrap(), json);
    }
}

#[test]
fn test_patient_fixture_fields() {
    let json = load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/r4/patient-example.json"));
    let patient = r4::Patient::from_json(&json).unwrap();

    assert_eq!(patient.id.as_deref(), Some("example"));
    assert_eq!(patient.gender, Some(r4::AdministrativeGender::Male));
    assert_eq!(patient.display_name().as_deref(), Some("Peter James Chalmers"));
    assert!(!patient.is_deceased());
    assert!(matches!(
        patient.multiple_birth,
        Some(r4::PatientMultipleBirth::Integer(_))
    ));

    let birth_time = patient.birth_date_ext.as_ref().unwrap();
    assert_eq!(birth_time.extensions().len(), 1);

    let contact_name = patient.contact.as_ref().unwrap()[0].name.as_ref().unwrap();
    assert!(contact_name.family_ext.is_some());
}

#[test]
fn test_bundle_fixture_entries() {
    let json = load(&Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/r4/bundle-transaction.json"));
    let bundle = r4::Bundle::from_json(&json).unwrap();

    assert_eq!(bundle.bundle_type, BundleType::Transaction);
    let entries = bundle.entry.as_ref().unwrap();
    assert_eq!(entries.len(), 4);
    assert!(matches!(
        entries[0].resource.as_ref(),
        Some(r4::Resource::Patient(_))
    ));
    assert!(matches!(
        entries[1].resource.as_ref(),
        Some(r4::Resource::Condition(_))
    ));
    // Basic is not modeled and stays raw
    let basic = entries[2].resource.as_ref().unwrap();
    assert!(!basic.is_modeled());
    assert_eq!(basic.resource_type(), "Basic");
    assert!(entries[3].resource.is_none());
}

#[test]
fn test_unmodeled_contained_kept_raw() {
    let json = load(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/r4/medicationrequest-taper.json"),
    );
    let request = r4::MedicationRequest::from_json(&json).unwrap();

    let contained = request.contained();
    assert_eq!(contained.len(), 1);
    assert_eq!(contained[0].resource_type(), "Medication");
    assert_eq!(contained[0].id(), Some("med0306"));

    // maxDosePerPeriod changes cardinality in R5 and is carried unmodeled
    let dosage = &request.dosage_instruction.as_ref().unwrap()[0];
    assert!(dosage.to_json().unwrap().get("maxDosePerPeriod").is_some());
}

#[test]
fn test_wrong_release_shape_rejected() {
    let json = load(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/r4/medicationrequest-taper.json"),
    );
    assert!(r5::Resource::from_value(json).is_err());
}

#[test]
fn test_decimal_text_survives_roundtrip() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/r4/observation-decimal-precision.json");
    let text = fs::read_to_string(&path).unwrap();
    let observation = r4::Observation::from_json_str(&text).unwrap();

    let quantity = observation.value_quantity().unwrap();
    assert_eq!(quantity.value, Some(Decimal::from(72)));
    assert_eq!(quantity.value.unwrap().scale(), 0);

    let written = observation.to_json_string().unwrap();
    assert!(written.contains(r#""value":72,"#), "{}", written);
    assert!(!written.contains("72.0"), "{}", written);
    assert!(written.contains(r#""value":1.50,"#), "{}", written);
    assert!(written.contains(r#""factor":0.100"#), "{}", written);
    assert!(written.contains(r#""origin":{"value":0.0}"#), "{}", written);
}
