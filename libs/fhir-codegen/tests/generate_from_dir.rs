use fhirbind_codegen::generators::GeneratorConfig;
use fhirbind_codegen::{generate_rust_from_dir, CodeGenerator};
use serde_json::json;
use std::fs;
use std::path::Path;

fn element(path: &str, min: u32, max: &str, codes: &[&str]) -> serde_json::Value {
    let types: Vec<_> = codes.iter().map(|c| json!({ "code": c })).collect();
    json!({ "path": path, "min": min, "max": max, "type": types })
}

fn write_definitions(dir: &Path) {
    let observation = json!({
        "resourceType": "StructureDefinition",
        "url": "http://hl7.org/fhir/StructureDefinition/Observation",
        "name": "Observation",
        "status": "active",
        "fhirVersion": "4.0.1",
        "kind": "resource",
        "abstract": false,
        "type": "Observation",
        "baseDefinition": "http://hl7.org/fhir/StructureDefinition/DomainResource",
        "derivation": "specialization",
        "snapshot": { "element": [
            { "path": "Observation", "min": 0, "max": "*" },
            element("Observation.id", 0, "1", &["http://hl7.org/fhirpath/System.String"]),
            element("Observation.status", 1, "1", &["code"]),
            element("Observation.code", 1, "1", &["CodeableConcept"]),
            element("Observation.value[x]", 0, "1", &["Quantity", "string", "boolean"]),
            element("Observation.component", 0, "*", &["BackboneElement"]),
            element("Observation.component.modifierExtension", 0, "*", &["Extension"]),
            element("Observation.component.code", 1, "1", &["CodeableConcept"]),
            element("Observation.component.value[x]", 0, "1", &["Quantity", "string"])
        ]}
    });

    // A profile on Observation travels in the same Bundle and must be ignored
    let bundle = json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [
            { "resource": {
                "resourceType": "StructureDefinition",
                "url": "http://hl7.org/fhir/StructureDefinition/vitalsigns",
                "name": "observation-vitalsigns",
                "status": "draft",
                "fhirVersion": "4.0.1",
                "kind": "resource",
                "abstract": false,
                "type": "Observation",
                "baseDefinition": "http://hl7.org/fhir/StructureDefinition/Observation",
                "derivation": "constraint"
            }}
        ]
    });

    fs::write(dir.join("observation.json"), observation.to_string()).unwrap();
    fs::write(dir.join("profiles.json"), bundle.to_string()).unwrap();
    fs::write(dir.join("README.md"), "not a definition").unwrap();
}

#[test]
fn test_generate_writes_modules() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_definitions(input.path());

    let written = generate_rust_from_dir(input.path(), output.path(), GeneratorConfig::default())
        .unwrap();
    assert_eq!(written, 2);

    let observation = fs::read_to_string(output.path().join("observation.rs")).unwrap();
    assert!(observation.starts_with("//! Observation\n"));
    assert!(observation.contains("Generated from http://hl7.org/fhir/StructureDefinition/Observation"));
    assert!(observation.contains("pub enum ObservationValue(\"value\") {"));
    assert!(observation.contains("pub enum ObservationComponentValue(\"value\") {"));
    assert!(observation.contains("    pub status: String,"));
    assert!(observation.contains("    pub component: Option<Vec<ObservationComponent>>,"));
    assert!(observation.contains("pub struct ObservationBuilder => Observation {"));

    let mod_rs = fs::read_to_string(output.path().join("mod.rs")).unwrap();
    assert!(mod_rs.contains("pub enum Resource for R4 {"));
    assert!(mod_rs.contains("        Observation(Observation),"));
}

#[test]
fn test_registry_skips_profiles() {
    let input = tempfile::tempdir().unwrap();
    write_definitions(input.path());

    let codegen = CodeGenerator::from_dir(input.path()).unwrap();
    let registry = codegen.registry();
    assert_eq!(registry.len(), 1);

    let observation = registry.get_type_by_name("Observation").unwrap();
    assert_eq!(observation.backbone_elements.len(), 1);
    assert_eq!(observation.backbone_elements[0].name, "ObservationComponent");
}

#[test]
fn test_generate_creates_missing_output_dir() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_definitions(input.path());

    let nested = output.path().join("src").join("generated");
    generate_rust_from_dir(input.path(), &nested, GeneratorConfig::default()).unwrap();
    assert!(nested.join("mod.rs").exists());
}

#[test]
fn test_missing_input_dir_is_an_error() {
    let output = tempfile::tempdir().unwrap();
    let err = generate_rust_from_dir(
        &output.path().join("missing"),
        output.path(),
        GeneratorConfig::default(),
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("reading input directory"));
}
