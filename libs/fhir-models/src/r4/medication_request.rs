//! MedicationRequest (R4)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationRequestStatus {
    #[default]
    Active,
    OnHold,
    Cancelled,
    Completed,
    EnteredInError,
    Stopped,
    Draft,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MedicationRequestIntent {
    Proposal,
    Plan,
    #[default]
    Order,
    OriginalOrder,
    ReflexOrder,
    FillerOrder,
    InstanceOrder,
    Option,
}

/// Identifies the level of importance to be assigned to actioning the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    Routine,
    Urgent,
    Asap,
    Stat,
}

crate::choice_type! {
    /// MedicationRequest.reported[x]
    pub enum MedicationRequestReported("reported") {
        Boolean(Primitive<bool>),
        Reference(Reference),
    }
}

crate::choice_type! {
    /// MedicationRequest.medication[x]
    pub enum MedicationRequestMedication("medication") {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

/// Ordering of medication for patient or group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

    /// active | on-hold | cancelled | completed | entered-in-error | stopped | draft | unknown
    pub status: MedicationRequestStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<CodeableConcept>,

    /// proposal | plan | order | original-order | reflex-order | filler-order | instance-order | option
    pub intent: MedicationRequestIntent,

    #[serde(rename = "_intent", skip_serializing_if = "Option::is_none")]
    pub intent_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// routine | urgent | asap | stat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<RequestPriority>,

    #[serde(rename = "_priority", skip_serializing_if = "Option::is_none")]
    pub priority_ext: Option<Element>,

    /// True if request is prohibiting action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_perform: Option<bool>,

    #[serde(rename = "_doNotPerform", skip_serializing_if = "Option::is_none")]
    pub do_not_perform_ext: Option<Element>,

    /// Reported rather than primary record
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub reported: Option<MedicationRequestReported>,

    /// Medication to be taken
    #[serde(flatten)]
    pub medication: MedicationRequestMedication,

    /// Who or group medication request is for
    pub subject: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting_information: Option<Vec<Reference>>,

    /// When request was initially authored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authored_on: Option<String>,

    #[serde(rename = "_authoredOn", skip_serializing_if = "Option::is_none")]
    pub authored_on_ext: Option<Element>,

    /// Who/What requested the Request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer_type: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_reference: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instantiates_canonical: Option<Vec<String>>,

    #[serde(rename = "_instantiatesCanonical", skip_serializing_if = "Option::is_none")]
    pub instantiates_canonical_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instantiates_uri: Option<Vec<String>>,

    #[serde(rename = "_instantiatesUri", skip_serializing_if = "Option::is_none")]
    pub instantiates_uri_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_identifier: Option<Identifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_of_therapy_type: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    /// How the medication should be taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage_instruction: Option<Vec<Dosage>>,

    /// Medication supply authorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_request: Option<MedicationRequestDispenseRequest>,

    /// Any restrictions on medication substitution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitution: Option<MedicationRequestSubstitution>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_prescription: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_issue: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_history: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Default for MedicationRequest {
    fn default() -> Self {
        Self {
            resource_type: Default::default(),
            id: Default::default(),
            meta: Default::default(),
            implicit_rules: Default::default(),
            implicit_rules_ext: Default::default(),
            language: Default::default(),
            language_ext: Default::default(),
            text: Default::default(),
            contained: Default::default(),
            extension: Default::default(),
            modifier_extension: Default::default(),
            identifier: Default::default(),
            status: Default::default(),
            status_ext: None,
            status_reason: Default::default(),
            intent: Default::default(),
            intent_ext: None,
            category: Default::default(),
            priority: Default::default(),
            priority_ext: None,
            do_not_perform: Default::default(),
            do_not_perform_ext: None,
            reported: None,
            medication: MedicationRequestMedication::CodeableConcept(Default::default()),
            subject: Default::default(),
            encounter: Default::default(),
            supporting_information: Default::default(),
            authored_on: Default::default(),
            authored_on_ext: None,
            requester: Default::default(),
            performer: Default::default(),
            performer_type: Default::default(),
            recorder: Default::default(),
            reason_code: Default::default(),
            reason_reference: Default::default(),
            instantiates_canonical: Default::default(),
            instantiates_canonical_ext: None,
            instantiates_uri: Default::default(),
            instantiates_uri_ext: None,
            based_on: Default::default(),
            group_identifier: Default::default(),
            course_of_therapy_type: Default::default(),
            insurance: Default::default(),
            note: Default::default(),
            dosage_instruction: Default::default(),
            dispense_request: Default::default(),
            substitution: Default::default(),
            prior_prescription: Default::default(),
            detected_issue: Default::default(),
            event_history: Default::default(),
            additional: Map::new(),
        }
    }
}

impl MedicationRequest {
    pub fn new(
        status: MedicationRequestStatus,
        intent: MedicationRequestIntent,
        medication: MedicationRequestMedication,
        subject: impl Into<Reference>,
    ) -> Self {
        Self {
            status,
            intent,
            medication,
            subject: subject.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(
    MedicationRequest,
    "MedicationRequest",
    choices = [MedicationRequestReported, MedicationRequestMedication]
);
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
        req set_status(status: MedicationRequestStatus);
        set set_status_reason(status_reason: CodeableConcept);
        req set_intent(intent: MedicationRequestIntent);
        add add_category(category: CodeableConcept);
        set set_priority(priority: RequestPriority);
        set set_do_not_perform(do_not_perform: bool);
        set set_reported(reported: MedicationRequestReported);
        req set_medication(medication: MedicationRequestMedication);
        req set_subject(subject: Reference);
        set set_encounter(encounter: Reference);
        add add_supporting_information(supporting_information: Reference);
        set set_authored_on(authored_on: String);
        set set_requester(requester: Reference);
        set set_performer(performer: Reference);
        set set_performer_type(performer_type: CodeableConcept);
        set set_recorder(recorder: Reference);
        add add_reason_code(reason_code: CodeableConcept);
        add add_reason_reference(reason_reference: Reference);
        add add_instantiates_canonical(instantiates_canonical: String);
        add add_instantiates_uri(instantiates_uri: String);
        add add_based_on(based_on: Reference);
        set set_group_identifier(group_identifier: Identifier);
        set set_course_of_therapy_type(course_of_therapy_type: CodeableConcept);
        add add_insurance(insurance: Reference);
        add add_note(note: Annotation);
        add add_dosage_instruction(dosage_instruction: Dosage);
        set set_dispense_request(dispense_request: MedicationRequestDispenseRequest);
        set set_substitution(substitution: MedicationRequestSubstitution);
        set set_prior_prescription(prior_prescription: Reference);
        add add_detected_issue(detected_issue: Reference);
        add add_event_history(event_history: Reference);
    }
}

impl MedicationRequestBuilder {
    pub fn new(
        status: MedicationRequestStatus,
        intent: MedicationRequestIntent,
        medication: MedicationRequestMedication,
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

    /// First fill details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_fill: Option<MedicationRequestDispenseRequestInitialFill>,

    /// Minimum period of time between dispenses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispense_interval: Option<Duration>,

    /// Time period supply is authorized for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<Period>,

    /// Number of refills authorized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_repeats_allowed: Option<u32>,

    #[serde(rename = "_numberOfRepeatsAllowed", skip_serializing_if = "Option::is_none")]
    pub number_of_repeats_allowed_ext: Option<Element>,

    /// Amount of medication to supply per dispense
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_supply_duration: Option<Duration>,

    /// Intended dispenser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Reference>,

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
        set set_performer(performer: Reference);
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

    /// First fill quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    /// First fill duration
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

    /// Whether substitution is allowed or not
    #[serde(flatten)]
    pub allowed: MedicationRequestSubstitutionAllowed,

    /// Why should (not) substitution be made
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

impl MedicationRequest {
    /// The coded medication, when not given by reference
    pub fn medication_code(&self) -> Option<&CodeableConcept> {
        match &self.medication {
            MedicationRequestMedication::CodeableConcept(code) => Some(code),
            MedicationRequestMedication::Reference(_) => None,
        }
    }

    pub fn substitution_allowed(&self) -> Option<bool> {
        match &self.substitution.as_ref()?.allowed {
            MedicationRequestSubstitutionAllowed::Boolean(allowed) => allowed.value,
            MedicationRequestSubstitutionAllowed::CodeableConcept(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RXNORM: &str = "http://www.nlm.nih.gov/research/umls/rxnorm";

    #[test]
    fn test_roundtrip() {
        let json = json!({
            "resourceType": "MedicationRequest",
            "id": "medrx0311",
            "status": "active",
            "intent": "order",
            "priority": "urgent",
            "medicationCodeableConcept": {"coding": [{"system": RXNORM, "code": "582620"}]},
            "subject": {"reference": "Patient/pat1"},
            "authoredOn": "2015-01-15",
            "dosageInstruction": [{
                "sequence": 1,
                "text": "6 mg PO daily for remission induction",
                "timing": {"repeat": {"frequency": 1, "period": 1.5, "periodUnit": "d"}},
                "doseAndRate": [{"doseQuantity": {"value": 6.5, "unit": "mg"}}]
            }],
            "dispenseRequest": {
                "initialFill": {"quantity": {"value": 30.5, "unit": "TAB"}},
                "numberOfRepeatsAllowed": 3,
                "validityPeriod": {"start": "2015-01-15", "end": "2016-01-15"}
            },
            "substitution": {"allowedBoolean": false, "reason": {"text": "formulary"}}
        });
        let request = MedicationRequest::from_json(&json).unwrap();

        assert_eq!(request.priority, Some(RequestPriority::Urgent));
        assert!(request.medication_code().unwrap().has_coding(RXNORM, "582620"));
        assert_eq!(request.substitution_allowed(), Some(false));
        assert_eq!(
            request.dispense_request.as_ref().unwrap().number_of_repeats_allowed,
            Some(3)
        );
        assert_eq!(request.to_json().unwrap(), json);
    }

    #[test]
    fn test_missing_medication_rejected() {
        let json = json!({
            "resourceType": "MedicationRequest",
            "status": "active",
            "intent": "order",
            "subject": {"reference": "Patient/pat1"}
        });
        assert!(MedicationRequest::from_json(&json).is_err());
    }

    #[test]
    fn test_builder_with_reference_medication() {
        let request = MedicationRequestBuilder::new(
            MedicationRequestStatus::Draft,
            MedicationRequestIntent::Proposal,
            MedicationRequestMedication::Reference(Reference::to("#med1")),
            Reference::to("Patient/1"),
        )
        .add_dosage_instruction(
            DosageBuilder::default()
                .set_text("1 tablet at night")
                .set_as_needed(DosageAsNeeded::Boolean(true.into()))
                .build(),
        )
        .build();

        assert!(request.medication_code().is_none());
        let json = request.to_json().unwrap();
        assert_eq!(json["intent"], "proposal");
        assert_eq!(json["medicationReference"]["reference"], "#med1");
        assert!(json.get("medicationCodeableConcept").is_none());
        assert_eq!(json["dosageInstruction"][0]["asNeededBoolean"], true);
    }

    #[test]
    fn test_intent_codes() {
        assert_eq!(
            serde_json::to_value(MedicationRequestIntent::OriginalOrder).unwrap(),
            "original-order"
        );
        assert_eq!(serde_json::to_value(MedicationRequestStatus::OnHold).unwrap(), "on-hold");
    }
}
