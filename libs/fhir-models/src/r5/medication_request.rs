//! MedicationRequest (R5)
//!
//! The medication is a CodeableReference and `reported` a plain boolean.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

pub use crate::r4::{MedicationRequestIntent, RequestPriority};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationRequestStatus {
    #[default]
    Active,
    OnHold,
    Ended,
    Stopped,
    Completed,
    Cancelled,
    EnteredInError,
    Draft,
    Unknown,
}

/// Ordering of medication for patient or group
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequest {
    #[serde(default)]
    pub resource_type: ResourceTag<MedicationRequest>,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Metadata about the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// A set of rules under which this content was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit_rules: Option<String>,

    #[serde(rename = "_implicitRules", skip_serializing_if = "Option::is_none")]
    pub implicit_rules_ext: Option<Element>,

    /// Language of the resource content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(rename = "_language", skip_serializing_if = "Option::is_none")]
    pub language_ext: Option<Element>,

    /// Text summary of the resource, for human interpretation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    /// Contained, inline Resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<Vec<Resource>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_prescription: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<Identifier>,

    /// active | on-hold | ended | stopped | completed | cancelled | entered-in-error | draft | unknown
    pub status: MedicationRequestStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<CodeableConcept>,

    /// When the status was changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_changed: Option<String>,

    #[serde(rename = "_statusChanged", skip_serializing_if = "Option::is_none")]
    pub status_changed_ext: Option<Element>,

    pub intent: MedicationRequestIntent,

    #[serde(rename = "_intent", skip_serializing_if = "Option::is_none")]
    pub intent_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<RequestPriority>,

    #[serde(rename = "_priority", skip_serializing_if = "Option::is_none")]
    pub priority_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_perform: Option<bool>,

    #[serde(rename = "_doNotPerform", skip_serializing_if = "Option::is_none")]
    pub do_not_perform_ext: Option<Element>,

    /// Medication to be taken
    pub medication: CodeableReference,

    pub subject: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_source: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting_information: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<String>,

    #[serde(rename = "_authoredOn", skip_serializing_if = "Option::is_none")]
    pub authored_on_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<Reference>,

    /// Reported rather than primary record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported: Option<bool>,

    #[serde(rename = "_reported", skip_serializing_if = "Option::is_none")]
    pub reported_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_type: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,

    /// Intended type of device for the administration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Vec<CodeableReference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<Vec<CodeableReference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_of_therapy_type: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    /// Full representation of the dosage instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered_dosage_instruction: Option<String>,

    #[serde(rename = "_renderedDosageInstruction", skip_serializing_if = "Option::is_none")]
    pub rendered_dosage_instruction_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_dose_period: Option<Period>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_instruction: Option<Vec<Dosage>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_request: Option<MedicationRequestDispenseRequest>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution: Option<MedicationRequestSubstitution>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_history: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl MedicationRequest {
    pub fn new(
        status: MedicationRequestStatus,
        intent: MedicationRequestIntent,
        medication: impl Into<CodeableReference>,
        subject: impl Into<Reference>,
    ) -> Self {
        Self {
            status,
            intent,
            medication: medication.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(MedicationRequest, "MedicationRequest");
crate::impl_domain_resource!(MedicationRequest, "MedicationRequest", contained = Resource);

crate::model_builder! {
    pub struct MedicationRequestBuilder => MedicationRequest {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        add add_based_on(based_on: Reference);
        set set_prior_prescription(prior_prescription: Reference);
        set set_group_identifier(group_identifier: Identifier);
        req set_status(status: MedicationRequestStatus);
        set set_status_reason(status_reason: CodeableConcept);
        set set_status_changed(status_changed: String);
        req set_intent(intent: MedicationRequestIntent);
        add add_category(category: CodeableConcept);
        set set_priority(priority: RequestPriority);
        set set_do_not_perform(do_not_perform: bool);
        req set_medication(medication: CodeableReference);
        req set_subject(subject: Reference);
        add add_information_source(information_source: Reference);
        set set_encounter(encounter: Reference);
        add add_supporting_information(supporting_information: Reference);
        set set_authored_on(authored_on: String);
        set set_requester(requester: Reference);
        set set_reported(reported: bool);
        set set_performer_type(performer_type: CodeableConcept);
        add add_performer(performer: Reference);
        add add_device(device: CodeableReference);
        set set_recorder(recorder: Reference);
        add add_reason(reason: CodeableReference);
        set set_course_of_therapy_type(course_of_therapy_type: CodeableConcept);
        add add_insurance(insurance: Reference);
        add add_note(note: Annotation);
        set set_rendered_dosage_instruction(rendered_dosage_instruction: String);
        set set_effective_dose_period(effective_dose_period: Period);
        add add_dosage_instruction(dosage_instruction: Dosage);
        set set_dispense_request(dispense_request: MedicationRequestDispenseRequest);
        set set_substitution(substitution: MedicationRequestSubstitution);
        add add_event_history(event_history: Reference);
    }
}

impl MedicationRequestBuilder {
    pub fn new(
        status: MedicationRequestStatus,
        intent: MedicationRequestIntent,
        medication: impl Into<CodeableReference>,
        subject: impl Into<Reference>,
    ) -> Self {
        Self::from(MedicationRequest::new(status, intent, medication, subject))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequestDispenseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_fill: Option<MedicationRequestDispenseRequestInitialFill>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_interval: Option<Duration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<Period>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_repeats_allowed: Option<u32>,

    #[serde(rename = "_numberOfRepeatsAllowed", skip_serializing_if = "Option::is_none")]
    pub number_of_repeats_allowed_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_supply_duration: Option<Duration>,

    /// Intended performer of dispense
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispenser: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispenser_instruction: Option<Vec<Annotation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose_administration_aid: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(MedicationRequestDispenseRequest, "MedicationRequest.dispenseRequest");
crate::impl_backbone_element!(MedicationRequestDispenseRequest);

crate::model_builder! {
    pub struct MedicationRequestDispenseRequestBuilder => MedicationRequestDispenseRequest {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_initial_fill(initial_fill: MedicationRequestDispenseRequestInitialFill);
        set set_dispense_interval(dispense_interval: Duration);
        set set_validity_period(validity_period: Period);
        set set_number_of_repeats_allowed(number_of_repeats_allowed: u32);
        set set_quantity(quantity: SimpleQuantity);
        set set_expected_supply_duration(expected_supply_duration: Duration);
        set set_dispenser(dispenser: Reference);
        add add_dispenser_instruction(dispenser_instruction: Annotation);
        set set_dose_administration_aid(dose_administration_aid: CodeableConcept);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequestDispenseRequestInitialFill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(MedicationRequestDispenseRequestInitialFill, "MedicationRequest.dispenseRequest.initialFill");
crate::impl_backbone_element!(MedicationRequestDispenseRequestInitialFill);

crate::model_builder! {
    pub struct MedicationRequestDispenseRequestInitialFillBuilder => MedicationRequestDispenseRequestInitialFill {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_quantity(quantity: SimpleQuantity);
        set set_duration(duration: Duration);
    }
}

crate::choice_type! {
    /// MedicationRequest.substitution.allowed[x]
    pub enum MedicationRequestSubstitutionAllowed("allowed") {
        Boolean(Primitive<bool>),
        CodeableConcept(CodeableConcept),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationRequestSubstitution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(flatten)]
    pub allowed: MedicationRequestSubstitutionAllowed,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Default for MedicationRequestSubstitution {
    fn default() -> Self {
        Self {
            id: Default::default(),
            extension: Default::default(),
            modifier_extension: Default::default(),
            allowed: MedicationRequestSubstitutionAllowed::Boolean(Default::default()),
            reason: Default::default(),
            additional: Map::new(),
        }
    }
}

impl MedicationRequestSubstitution {
    pub fn new(allowed: MedicationRequestSubstitutionAllowed) -> Self {
        Self {
            allowed,
            ..Default::default()
        }
    }
}

crate::fhir_model!(
    MedicationRequestSubstitution,
    "MedicationRequest.substitution",
    choices = [MedicationRequestSubstitutionAllowed]
);
crate::impl_backbone_element!(MedicationRequestSubstitution);

crate::model_builder! {
    pub struct MedicationRequestSubstitutionBuilder => MedicationRequestSubstitution {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_allowed(allowed: MedicationRequestSubstitutionAllowed);
        set set_reason(reason: CodeableConcept);
    }
}

impl MedicationRequestSubstitutionBuilder {
    pub fn new(allowed: MedicationRequestSubstitutionAllowed) -> Self {
        Self::from(MedicationRequestSubstitution::new(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip() {
        let json = json!({
            "resourceType": "MedicationRequest",
            "status": "ended",
            "intent": "order",
            "medication": {"concept": {"coding": [{"code": "582620"}]}},
            "subject": {"reference": "Patient/pat1"},
            "reported": true,
            "renderedDosageInstruction": "6 mg once daily",
            "dispenseRequest": {
                "dispenser": {"reference": "Organization/pharmacy"},
                "dispenserInstruction": [{"text": "blister pack"}]
            }
        });
        let request = MedicationRequest::from_json(&json).unwrap();

        assert_eq!(request.status, MedicationRequestStatus::Ended);
        assert_eq!(request.reported, Some(true));
        assert!(request.medication.concept.is_some());
        assert_eq!(request.to_json().unwrap(), json);
    }

    #[test]
    fn test_r4_shape_is_not_r5() {
        let json = json!({
            "resourceType": "MedicationRequest",
            "status": "active",
            "intent": "order",
            "medicationCodeableConcept": {"text": "aspirin"},
            "subject": {"reference": "Patient/1"}
        });
        assert!(MedicationRequest::from_json(&json).is_err());
    }

    #[test]
    fn test_builder() {
        let request = MedicationRequestBuilder::new(
            MedicationRequestStatus::Draft,
            MedicationRequestIntent::Plan,
            CodeableReference::from(CodeableConcept::from_text("aspirin")),
            Reference::to("Patient/1"),
        )
        .set_priority(RequestPriority::Stat)
        .build();

        let json = request.to_json().unwrap();
        assert_eq!(json["medication"]["concept"]["text"], "aspirin");
        assert_eq!(json["priority"], "stat");
    }
}
