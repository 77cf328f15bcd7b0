//! Validating builds against pluggable validators

use async_trait::async_trait;
use fhirbind_models::prelude::*;
use fhirbind_models::r4::{
    ConditionBuilder, ObservationBuilder, ObservationStatus, ObservationValue, OperationOutcome,
    PatientBuilder,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Requires `subject` on every Observation, records what it was shown
#[derive(Default)]
struct SubjectRequired {
    seen: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

#[async_trait]
impl ResourceValidator for SubjectRequired {
    async fn validate(&self, type_name: &str, json: &Value) -> Result<(), ValidationFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(type_name.to_string());
        tokio::task::yield_now().await;

        if type_name == "Observation" && json.get("subject").is_none() {
            return Err(ValidationFailure::new(vec![
                ValidationIssue::error("required", "Observation.subject: minimum required = 1")
                    .at("Observation.subject"),
                ValidationIssue::warning("informational", "no narrative"),
            ]));
        }
        Ok(())
    }
}

fn heart_rate() -> ObservationBuilder {
    ObservationBuilder::new(
        ObservationStatus::Final,
        Coding::new("http://loinc.org", "8867-4"),
    )
    .set_value(ObservationValue::Quantity(Quantity::ucum(Decimal::new(725, 1), "/min")))
}

#[tokio::test]
async fn test_noop_validator_returns_model() {
    let observation = heart_rate().build_validated(&NoopValidator).await.unwrap();
    assert_eq!(observation, heart_rate().build());
}

#[tokio::test]
async fn test_async_validator_rejects() {
    let validator = SubjectRequired::default();

    let err = heart_rate().build_validated(&validator).await.unwrap_err();
    let failure = match err {
        Error::Validation(failure) => failure,
        other => panic!("expected validation error, got {:?}", other),
    };
    assert_eq!(failure.issues.len(), 2);
    assert_eq!(failure.error_count(), 1);

    let outcome = OperationOutcome::from(&failure);
    assert!(outcome.has_errors());
    let json = outcome.to_json().unwrap();
    assert_eq!(json["issue"][0]["expression"][0], "Observation.subject");
    assert_eq!(json["issue"][1]["severity"], "warning");
}

#[tokio::test]
async fn test_async_validator_accepts_and_sees_json() {
    let validator = SubjectRequired::default();

    let observation = heart_rate()
        .set_subject(Reference::to("Patient/example"))
        .build_validated(&validator)
        .await
        .unwrap();
    assert_eq!(
        observation.subject.as_ref().and_then(|s| s.reference.as_deref()),
        Some("Patient/example")
    );

    ConditionBuilder::new(Reference::to("Patient/example"))
        .build_validated(&validator)
        .await
        .unwrap();

    assert_eq!(validator.calls.load(Ordering::SeqCst), 2);
    assert_eq!(*validator.seen.lock().unwrap(), vec!["Observation", "Condition"]);
}

#[tokio::test]
async fn test_fn_validator_receives_serialized_form() {
    let validator = FnValidator(|type_name: &str, json: &Value| {
        assert_eq!(type_name, "Patient");
        assert_eq!(json["resourceType"], "Patient");
        if json["name"][0]["family"] == "Chalmers" {
            Ok(())
        } else {
            Err(ValidationFailure::single(ValidationIssue::error(
                "invariant",
                "unexpected family name",
            )))
        }
    });

    let accepted = PatientBuilder::default()
        .add_name(HumanName::new("Chalmers", "Peter"))
        .build_validated(&validator)
        .await;
    assert!(accepted.is_ok());

    let rejected = PatientBuilder::default()
        .add_name(HumanName::new("Windsor", "Peter"))
        .build_validated(&validator)
        .await;
    assert!(matches!(rejected, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_validator_as_trait_object() {
    let validators: Vec<Box<dyn ResourceValidator>> = vec![
        Box::new(NoopValidator),
        Box::new(SubjectRequired::default()),
    ];

    let mut results = Vec::new();
    for validator in &validators {
        results.push(heart_rate().build_validated(validator.as_ref()).await.is_ok());
    }
    assert_eq!(results, vec![true, false]);
}

#[tokio::test]
async fn test_datatype_builders_validate_too() {
    let validator = FnValidator(|type_name: &str, _json: &Value| {
        assert_eq!(type_name, "Coding");
        Ok(())
    });

    let coding = CodingBuilder::default()
        .set_system("http://snomed.info/sct")
        .set_code("22298006")
        .build_validated(&validator)
        .await
        .unwrap();
    assert_eq!(coding.code.as_deref(), Some("22298006"));
}

#[test]
fn test_update_reaches_unsettered_fields() {
    let observation = heart_rate()
        .update(|o| o.implicit_rules = Some("http://example.org/rules".into()))
        .build();
    assert_eq!(
        observation.to_json().unwrap()["implicitRules"],
        "http://example.org/rules"
    );
}
