//! Property-based tests for choice elements and immutable updates

use fhirbind_models::choice::{present_tags, set_choice};
use fhirbind_models::prelude::*;
use fhirbind_models::r4::{
    Observation, ObservationBuilder, ObservationStatus, ObservationValue, Patient, PatientBuilder,
};
use quickcheck::{QuickCheck, TestResult};
use serde_json::{json, Map, Value};

const GROUP: ChoiceGroup = ObservationValue::GROUP;

/// A valid JSON value for each `Observation.value[x]` variant
fn sample(tag: &str, text: &str) -> Value {
    match tag {
        "Quantity" => json!({"value": 1.5, "unit": text}),
        "CodeableConcept" => json!({"text": text}),
        "String" => json!(text),
        "Boolean" => json!(true),
        "Integer" => json!(7),
        "Range" => json!({"low": {"value": 1.5}, "high": {"value": 2.5}}),
        "Ratio" => json!({"numerator": {"value": 1.5}, "denominator": {"value": 3.5}}),
        "SampledData" => json!({"origin": {"value": 0.5}, "period": 2.5, "dimensions": 1}),
        "Time" => json!("10:30:00"),
        "DateTime" => json!("2021-03-04T10:30:00Z"),
        "Period" => json!({"start": "2021-03-04"}),
        other => panic!("no sample for {}", other),
    }
}

fn is_primitive(tag: &str) -> bool {
    matches!(tag, "String" | "Boolean" | "Integer" | "Time" | "DateTime")
}

fn base_observation() -> Map<String, Value> {
    json!({
        "resourceType": "Observation",
        "status": "final",
        "code": {"text": "sample"}
    })
    .as_object()
    .cloned()
    .unwrap()
}

/// Property: after any sequence of writes, only the last written variant remains
#[test]
fn prop_last_written_variant_wins() {
    fn prop(steps: Vec<(u8, bool)>, text: String) -> TestResult {
        if steps.is_empty() {
            return TestResult::discard();
        }

        let mut object = base_observation();
        let mut last = "";
        for (pick, with_sidecar) in &steps {
            let tag = GROUP.tags[*pick as usize % GROUP.tags.len()];
            if set_choice(&mut object, &GROUP, tag, sample(tag, &text)).is_err() {
                return TestResult::failed();
            }
            if *with_sidecar && is_primitive(tag) {
                object.insert(GROUP.sidecar_key(tag), json!({"id": "s"}));
            }
            last = tag;
        }

        if present_tags(&object, &GROUP) != vec![last] {
            return TestResult::failed();
        }

        // The typed model agrees with the raw object
        let observation = match Observation::from_json(&Value::Object(object.clone())) {
            Ok(observation) => observation,
            Err(_) => return TestResult::failed(),
        };
        let tag_matches = observation.value.as_ref().map(|v| v.tag()) == Some(last);
        let serialized = observation.to_json().ok();
        TestResult::from_bool(tag_matches && serialized == Some(Value::Object(object)))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<(u8, bool)>, String) -> TestResult);
}

/// Property: `with_json` switching variants never leaves two variants behind
#[test]
fn prop_with_json_switches_variant() {
    fn prop(from: u8, to: u8, text: String) -> TestResult {
        let from = GROUP.tags[from as usize % GROUP.tags.len()];
        let to = GROUP.tags[to as usize % GROUP.tags.len()];

        let mut object = base_observation();
        object.insert(GROUP.key(from), sample(from, &text));
        if is_primitive(from) {
            object.insert(GROUP.sidecar_key(from), json!({"id": "old"}));
        }
        let observation = match Observation::from_json(&Value::Object(object)) {
            Ok(observation) => observation,
            Err(_) => return TestResult::failed(),
        };

        let mut changes = Map::new();
        changes.insert(GROUP.key(to), sample(to, &text));
        let changed = match observation.with_json(&Value::Object(changes)) {
            Ok(changed) => changed,
            Err(_) => return TestResult::failed(),
        };

        let json = changed.to_json().unwrap();
        let remaining = present_tags(json.as_object().unwrap(), &GROUP);
        let receiver_kept = observation.value.as_ref().map(|v| v.tag()) == Some(from);
        TestResult::from_bool(remaining == vec![to] && receiver_kept)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, u8, String) -> TestResult);
}

/// Property: mutating a clone never affects the original
#[test]
fn prop_clone_is_independent() {
    fn prop(family: String, given: Vec<String>, replacement: String) -> TestResult {
        let patient = PatientBuilder::default()
            .add_name(HumanName {
                family: Some(family.clone()),
                given: Some(given.clone()),
                ..Default::default()
            })
            .build();
        let before = patient.to_json().unwrap();

        let mut copy = patient.clone();
        if let Some(name) = copy.name.as_mut().and_then(|names| names.first_mut()) {
            name.family = Some(replacement.clone());
            name.given.get_or_insert_with(Vec::new).push(replacement.clone());
        }
        copy.add_extension(Extension::new("http://example.org/touched"));

        TestResult::from_bool(
            patient.to_json().unwrap() == before
                && patient.extensions().is_empty()
                && patient.name.as_ref().unwrap()[0].family.as_deref() == Some(family.as_str()),
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String, Vec<String>, String) -> TestResult);
}

/// Property: `with` returns the changed copy and leaves the receiver untouched
#[test]
fn prop_with_leaves_receiver_untouched() {
    fn prop(id: String, digits: i64, scale: u8) -> TestResult {
        let value = Decimal::new(digits, u32::from(scale % 29));

        let observation = ObservationBuilder::new(ObservationStatus::Final, CodeableConcept::from_text("note"))
            .set_value(ObservationValue::String("initial".into()))
            .build();

        let changed = observation.with(|o| {
            o.id = Some(id.clone());
            o.value = Some(ObservationValue::Quantity(Quantity::new(value, "mg")));
        });

        let receiver_kept = observation.id.is_none()
            && matches!(observation.value, Some(ObservationValue::String(_)));
        let change_applied = changed.id.as_deref() == Some(id.as_str())
            && matches!(changed.value, Some(ObservationValue::Quantity(_)));
        TestResult::from_bool(receiver_kept && change_applied)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String, i64, u8) -> TestResult);
}

/// Property: text written into a model is read back unchanged
#[test]
fn prop_patient_text_roundtrip() {
    fn prop(family: String, city: String) -> TestResult {
        let patient = PatientBuilder::default()
            .add_name(HumanName {
                family: Some(family),
                ..Default::default()
            })
            .add_address(Address {
                city: Some(city),
                ..Default::default()
            })
            .build();

        let parsed = match Patient::from_json_str(&patient.to_json_string().unwrap()) {
            Ok(parsed) => parsed,
            Err(_) => return TestResult::failed(),
        };
        TestResult::from_bool(parsed == patient)
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String, String) -> TestResult);
}

#[test]
fn test_conflicting_variants_reported() {
    let mut object = base_observation();
    object.insert("valueString".into(), json!("a"));
    object.insert("valueBoolean".into(), json!(false));

    let err = Observation::from_json(&Value::Object(object)).unwrap_err();
    assert!(err.to_string().contains("value[x]"), "{}", err);
}
