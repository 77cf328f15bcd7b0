//! Observation (R5)
//!
//! Adds `triggeredBy`, `instantiates[x]`, `bodyStructure` and Attachment /
//! Reference result values to the R4 shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

pub use crate::r4::ObservationStatus;

/// The type of trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationTriggeredByType {
    #[default]
    Reflex,
    Repeat,
    ReRun,
}

crate::choice_type! {
    /// Observation.instantiates[x]
    pub enum ObservationInstantiates("instantiates") {
        Canonical(Primitive<String>),
        Reference(Reference),
    }
}

crate::choice_type! {
    /// Observation.effective[x]
    pub enum ObservationEffective("effective") {
        DateTime(Primitive<String>),
        Period(Period),
        Timing(Timing),
        Instant(Primitive<String>),
    }
}

crate::choice_type! {
    /// Observation.value[x]
    pub enum ObservationValue("value") {
        Quantity(Quantity),
        CodeableConcept(CodeableConcept),
        String(Primitive<String>),
        Boolean(Primitive<bool>),
        Integer(Primitive<i32>),
        Range(Range),
        Ratio(Ratio),
        SampledData(SampledData),
        Time(Primitive<String>),
        DateTime(Primitive<String>),
        Period(Period),
        Attachment(Attachment),
        Reference(Reference),
    }
}

/// Measurements and simple assertions made about a patient, device or other subject
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub resource_type: ResourceTag<Observation>,

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

    /// Business Identifier for observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// Instantiates FHIR ObservationDefinition
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub instantiates: Option<ObservationInstantiates>,

    /// Fulfills plan, proposal or order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    /// Triggering observation(s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<Vec<ObservationTriggeredBy>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Vec<Reference>>,

    /// registered | preliminary | final | amended +
    pub status: ObservationStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// Type of observation (code / type)
    pub code: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub effective: Option<ObservationEffective>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,

    #[serde(rename = "_issued", skip_serializing_if = "Option::is_none")]
    pub issued_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,

    /// Actual result
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub value: Option<ObservationValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<CodeableConcept>,

    /// Observed body structure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_structure: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<Vec<ObservationReferenceRange>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_member: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<Vec<Reference>>,

    /// Component results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Vec<ObservationComponent>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Observation {
    pub fn new(status: ObservationStatus, code: impl Into<CodeableConcept>) -> Self {
        Self {
            status,
            code: code.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(
    Observation,
    "Observation",
    choices = [ObservationInstantiates, ObservationEffective, ObservationValue]
);
crate::impl_domain_resource!(Observation, "Observation", contained = Resource);

crate::model_builder! {
    pub struct ObservationBuilder => Observation {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        set set_instantiates(instantiates: ObservationInstantiates);
        add add_based_on(based_on: Reference);
        add add_triggered_by(triggered_by: ObservationTriggeredBy);
        add add_part_of(part_of: Reference);
        req set_status(status: ObservationStatus);
        add add_category(category: CodeableConcept);
        req set_code(code: CodeableConcept);
        set set_subject(subject: Reference);
        add add_focus(focus: Reference);
        set set_encounter(encounter: Reference);
        set set_effective(effective: ObservationEffective);
        set set_issued(issued: String);
        add add_performer(performer: Reference);
        set set_value(value: ObservationValue);
        set set_data_absent_reason(data_absent_reason: CodeableConcept);
        add add_interpretation(interpretation: CodeableConcept);
        add add_note(note: Annotation);
        set set_body_site(body_site: CodeableConcept);
        set set_body_structure(body_structure: Reference);
        set set_method(method: CodeableConcept);
        set set_specimen(specimen: Reference);
        set set_device(device: Reference);
        add add_reference_range(reference_range: ObservationReferenceRange);
        add add_has_member(has_member: Reference);
        add add_derived_from(derived_from: Reference);
        add add_component(component: ObservationComponent);
    }
}

impl ObservationBuilder {
    pub fn new(status: ObservationStatus, code: impl Into<CodeableConcept>) -> Self {
        Self::from(Observation::new(status, code))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationTriggeredBy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Triggering observation
    pub observation: Reference,

    /// reflex | repeat | re-run
    #[serde(rename = "type")]
    pub type_: ObservationTriggeredByType,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub type_ext: Option<Element>,

    /// Reason that the observation was triggered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(rename = "_reason", skip_serializing_if = "Option::is_none")]
    pub reason_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ObservationTriggeredBy {
    pub fn new(observation: impl Into<Reference>, type_: ObservationTriggeredByType) -> Self {
        Self {
            observation: observation.into(),
            type_,
            ..Default::default()
        }
    }
}

crate::fhir_model!(ObservationTriggeredBy, "Observation.triggeredBy");
crate::impl_backbone_element!(ObservationTriggeredBy);

crate::model_builder! {
    pub struct ObservationTriggeredByBuilder => ObservationTriggeredBy {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_observation(observation: Reference);
        req set_type(type_: ObservationTriggeredByType);
        set set_reason(reason: String);
    }
}

impl ObservationTriggeredByBuilder {
    pub fn new(observation: impl Into<Reference>, type_: ObservationTriggeredByType) -> Self {
        Self::from(ObservationTriggeredBy::new(observation, type_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationReferenceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<SimpleQuantity>,

    /// Normal value, if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_value: Option<CodeableConcept>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Range>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "_text", skip_serializing_if = "Option::is_none")]
    pub text_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(ObservationReferenceRange, "Observation.referenceRange");
crate::impl_backbone_element!(ObservationReferenceRange);

crate::model_builder! {
    pub struct ObservationReferenceRangeBuilder => ObservationReferenceRange {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_low(low: SimpleQuantity);
        set set_high(high: SimpleQuantity);
        set set_normal_value(normal_value: CodeableConcept);
        set set_type(type_: CodeableConcept);
        add add_applies_to(applies_to: CodeableConcept);
        set set_age(age: Range);
        set set_text(text: String);
    }
}

crate::choice_type! {
    /// Observation.component.value[x]
    pub enum ObservationComponentValue("value") {
        Quantity(Quantity),
        CodeableConcept(CodeableConcept),
        String(Primitive<String>),
        Boolean(Primitive<bool>),
        Integer(Primitive<i32>),
        Range(Range),
        Ratio(Ratio),
        SampledData(SampledData),
        Time(Primitive<String>),
        DateTime(Primitive<String>),
        Period(Period),
        Attachment(Attachment),
        Reference(Reference),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    pub code: CodeableConcept,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub value: Option<ObservationComponentValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<Vec<ObservationReferenceRange>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ObservationComponent {
    pub fn new(code: impl Into<CodeableConcept>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(
    ObservationComponent,
    "Observation.component",
    choices = [ObservationComponentValue]
);
crate::impl_backbone_element!(ObservationComponent);

crate::model_builder! {
    pub struct ObservationComponentBuilder => ObservationComponent {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_code(code: CodeableConcept);
        set set_value(value: ObservationComponentValue);
        set set_data_absent_reason(data_absent_reason: CodeableConcept);
        add add_interpretation(interpretation: CodeableConcept);
        add add_reference_range(reference_range: ObservationReferenceRange);
    }
}

impl ObservationComponentBuilder {
    pub fn new(code: impl Into<CodeableConcept>) -> Self {
        Self::from(ObservationComponent::new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip_r5_members() {
        let json = json!({
            "resourceType": "Observation",
            "id": "reflex",
            "instantiatesCanonical": "http://example.org/ObservationDefinition/ferritin",
            "triggeredBy": [{
                "observation": {"reference": "Observation/hemoglobin"},
                "type": "reflex",
                "reason": "low hemoglobin"
            }],
            "status": "final",
            "code": {"text": "Ferritin"},
            "bodyStructure": {"reference": "BodyStructure/left-arm"},
            "valueAttachment": {"contentType": "application/pdf", "url": "http://example.org/report.pdf"},
            "referenceRange": [{"normalValue": {"text": "negative"}}]
        });
        let observation = Observation::from_json(&json).unwrap();

        let trigger = &observation.triggered_by.as_ref().unwrap()[0];
        assert_eq!(trigger.type_, ObservationTriggeredByType::Reflex);
        assert!(matches!(observation.instantiates, Some(ObservationInstantiates::Canonical(_))));
        assert!(matches!(observation.value, Some(ObservationValue::Attachment(_))));
        assert_eq!(observation.to_json().unwrap(), json);
    }

    #[test]
    fn test_reference_value_variant() {
        let observation = ObservationBuilder::new(ObservationStatus::Final, CodeableConcept::from_text("genomic"))
            .set_value(ObservationValue::Reference(Reference::to("MolecularSequence/1")))
            .add_triggered_by(ObservationTriggeredBy::new(
                Reference::to("Observation/screen"),
                ObservationTriggeredByType::ReRun,
            ))
            .build();

        let json = observation.to_json().unwrap();
        assert_eq!(json["valueReference"]["reference"], "MolecularSequence/1");
        assert_eq!(json["triggeredBy"][0]["type"], "re-run");
    }
}
