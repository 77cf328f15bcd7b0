//! FHIR R4 (4.0.1) resources
//!
//! Contained resources and bundle entries are typed by [`Resource`], which
//! keeps types outside this module as raw JSON.

mod claim;
mod condition;
mod encounter;
mod medication_request;
mod observation;
mod operation_outcome;
mod organization;
mod patient;
mod practitioner;

pub use claim::*;
pub use condition::*;
pub use encounter::*;
pub use medication_request::*;
pub use observation::*;
pub use operation_outcome::*;
pub use organization::*;
pub use patient::*;
pub use practitioner::*;

use crate::common::bundle;

crate::resource_union! {
    /// Any R4 resource
    pub enum Resource for R4 {
        Bundle(Bundle),
        Claim(Claim),
        Condition(Condition),
        Encounter(Encounter),
        MedicationRequest(MedicationRequest),
        Observation(Observation),
        OperationOutcome(OperationOutcome),
        Organization(Organization),
        Patient(Patient),
        Practitioner(Practitioner),
    }
}

pub type Bundle = bundle::Bundle<Resource>;
pub type BundleBuilder = bundle::BundleBuilder<Resource>;
pub type BundleEntry = bundle::BundleEntry<Resource>;
pub type BundleEntryResponse = bundle::BundleEntryResponse<Resource>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{FhirModel, HttpVerb, ModelBuilder, ResourceUnion};
    use serde_json::json;

    #[test]
    fn test_dispatch_on_resource_type() {
        let resource = Resource::from_json(&json!({
            "resourceType": "Patient",
            "id": "example",
            "active": true
        }))
        .unwrap();

        assert!(resource.is_modeled());
        assert_eq!(resource.resource_type(), "Patient");
        assert_eq!(resource.id(), Some("example"));
        match resource {
            Resource::Patient(patient) => assert_eq!(patient.active, Some(true)),
            other => panic!("expected Patient, got {:?}", other),
        }
    }

    #[test]
    fn test_unmodeled_type_kept_raw() {
        let json = json!({
            "resourceType": "Device",
            "id": "d1",
            "status": "active"
        });
        let resource = Resource::from_json(&json).unwrap();

        assert!(!resource.is_modeled());
        assert_eq!(resource.resource_type(), "Device");
        assert_eq!(resource.id(), Some("d1"));
        assert_eq!(resource.to_json().unwrap(), json);
    }

    #[test]
    fn test_missing_resource_type() {
        let err = Resource::from_json(&json!({"id": "x"})).unwrap_err();
        assert!(err.to_string().contains("resourceType"));
    }

    #[test]
    fn test_nested_decode_error_has_single_prefix() {
        let json = json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [{
                "resource": {
                    "resourceType": "Observation",
                    "status": "final",
                    "code": {"text": "x"},
                    "valueQuantity": {"value": "not a number"}
                }
            }]
        });
        let message = Bundle::from_json(&json).unwrap_err().to_string();
        assert_eq!(message.matches("Serialization error").count(), 1, "{}", message);
        assert!(message.contains("not a number"), "{}", message);
    }

    #[test]
    fn test_modeled_types() {
        assert!(Resource::is_modeled_type("Claim"));
        assert!(!Resource::is_modeled_type("Device"));
        assert_eq!(<Resource as ResourceUnion>::RELEASE, crate::FhirVersion::R4);
    }

    #[test]
    fn test_contained_resources_typed() {
        let json = json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"text": "glucose"},
            "contained": [
                {"resourceType": "Patient", "id": "p1"},
                {"resourceType": "Specimen", "id": "s1"}
            ],
            "subject": {"reference": "#p1"}
        });
        let observation = Observation::from_json(&json).unwrap();
        let contained = observation.contained.as_deref().unwrap();

        assert!(matches!(contained[0], Resource::Patient(_)));
        assert!(matches!(contained[1], Resource::Other(_)));
        assert_eq!(observation.to_json().unwrap(), json);
    }

    #[test]
    fn test_transaction_bundle() {
        let patient = PatientBuilder::default()
            .add_name(crate::datatypes::HumanName::new("Chalmers", "Peter"))
            .build();
        let bundle = BundleBuilder::new(crate::BundleType::Transaction)
            .add_request(HttpVerb::Post, "Patient", Some(Resource::from(patient)))
            .build();

        assert!(bundle.is_transaction());
        let json = bundle.to_json().unwrap();
        assert_eq!(json["entry"][0]["resource"]["resourceType"], "Patient");
        assert_eq!(json["entry"][0]["request"]["method"], "POST");

        let back = Bundle::from_json(&json).unwrap();
        assert_eq!(back, bundle);
        assert!(matches!(
            back.resources().next(),
            Some(Resource::Patient(_))
        ));
    }

    #[test]
    fn test_nested_bundle_variant() {
        let json = json!({
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [
                {"resource": {"resourceType": "Bundle", "type": "batch"}}
            ]
        });
        let resource = Resource::from_json(&json).unwrap();
        let Resource::Bundle(outer) = resource else {
            panic!("expected Bundle");
        };
        assert!(matches!(outer.resources().next(), Some(Resource::Bundle(_))));
    }
}
