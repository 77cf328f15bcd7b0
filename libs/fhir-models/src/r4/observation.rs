//! Observation (R4)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

/// Codes providing the status of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    #[default]
    Registered,
    Preliminary,
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
    Unknown,
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

    /// Fulfills plan, proposal or order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Vec<Reference>>,

    /// registered | preliminary | final | amended +
    pub status: ObservationStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// Classification of  type of observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// Type of observation (code / type)
    pub code: CodeableConcept,

    /// Who and/or what the observation is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<Vec<Reference>>,

    /// Healthcare event during which this observation is made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    /// Clinically relevant time/time-period for observation
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub effective: Option<ObservationEffective>,

    /// Date/Time this version was made available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<String>,

    #[serde(rename = "_issued", skip_serializing_if = "Option::is_none")]
    pub issued_ext: Option<Element>,

    /// Who is responsible for the observation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performer: Option<Vec<Reference>>,

    /// Actual result
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub value: Option<ObservationValue>,

    /// Why the result is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_absent_reason: Option<CodeableConcept>,

    /// High, low, normal, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub specimen: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Reference>,

    /// Provides guide for interpretation
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

crate::fhir_model!(Observation, "Observation", choices = [ObservationEffective, ObservationValue]);
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
        add add_based_on(based_on: Reference);
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

/// Guidance on how to interpret the value by comparison to a normal or recommended range
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationReferenceRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Low Range, if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<SimpleQuantity>,

    /// High Range, if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<SimpleQuantity>,

    /// Reference range qualifier
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    /// Reference range population
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applies_to: Option<Vec<CodeableConcept>>,

    /// Applicable age range, if relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Range>,

    /// Text based reference range in an observation
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
    }
}

/// Component results
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Type of component observation (code / type)
    pub code: CodeableConcept,

    /// Actual component result
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

impl Observation {
    /// The result when it is a Quantity
    pub fn value_quantity(&self) -> Option<&Quantity> {
        match &self.value {
            Some(ObservationValue::Quantity(quantity)) => Some(quantity),
            _ => None,
        }
    }

    pub fn component_by_code(&self, system: &str, code: &str) -> Option<&ObservationComponent> {
        self.component
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .find(|c| c.code.has_coding(system, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOINC: &str = "http://loinc.org";

    fn blood_pressure() -> Value {
        json!({
            "resourceType": "Observation",
            "id": "blood-pressure",
            "status": "final",
            "category": [{
                "coding": [{
                    "system": "http://terminology.hl7.org/CodeSystem/observation-category",
                    "code": "vital-signs"
                }]
            }],
            "code": {"coding": [{"system": LOINC, "code": "85354-9"}]},
            "subject": {"reference": "Patient/example"},
            "effectiveDateTime": "2012-09-17",
            "component": [
                {
                    "code": {"coding": [{"system": LOINC, "code": "8480-6"}]},
                    "valueQuantity": {"value": 107.5, "unit": "mmHg", "system": "http://unitsofmeasure.org", "code": "mm[Hg]"}
                },
                {
                    "code": {"coding": [{"system": LOINC, "code": "8462-4"}]},
                    "valueQuantity": {"value": 60.5, "unit": "mmHg", "system": "http://unitsofmeasure.org", "code": "mm[Hg]"}
                }
            ]
        })
    }

    #[test]
    fn test_roundtrip_with_components() {
        let json = blood_pressure();
        let observation = Observation::from_json(&json).unwrap();

        assert_eq!(observation.status, ObservationStatus::Final);
        assert!(matches!(observation.effective, Some(ObservationEffective::DateTime(_))));
        let systolic = observation.component_by_code(LOINC, "8480-6").unwrap();
        assert!(matches!(
            &systolic.value,
            Some(ObservationComponentValue::Quantity(q)) if q.value == Some(Decimal::new(1075, 1))
        ));
        assert_eq!(observation.to_json().unwrap(), json);
    }

    #[test]
    fn test_primitive_choice_with_sidecar() {
        let json = json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"text": "note"},
            "valueString": "negative",
            "_valueString": {"id": "v1"}
        });
        let observation = Observation::from_json(&json).unwrap();
        match &observation.value {
            Some(ObservationValue::String(value)) => {
                assert_eq!(value.value.as_deref(), Some("negative"));
                assert_eq!(value.element.as_ref().unwrap().id.as_deref(), Some("v1"));
            }
            other => panic!("unexpected value {:?}", other),
        }
        assert_eq!(observation.to_json().unwrap(), json);
    }

    #[test]
    fn test_conflicting_value_rejected() {
        let json = json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"text": "x"},
            "valueQuantity": {"value": 1.5},
            "valueString": "1.5"
        });
        let err = Observation::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn test_missing_required_status() {
        let json = json!({"resourceType": "Observation", "code": {"text": "x"}});
        assert!(Observation::from_json(&json).is_err());
    }

    #[test]
    fn test_with_json_replaces_choice_variant() {
        let observation = ObservationBuilder::new(ObservationStatus::Final, Coding::new(LOINC, "8867-4"))
            .set_value(ObservationValue::Quantity(Quantity::ucum(Decimal::new(725, 1), "/min")))
            .build();

        let changed = observation
            .with_json(&json!({"valueString": "regular", "status": "amended"}))
            .unwrap();

        assert!(observation.value_quantity().is_some());
        assert_eq!(changed.status, ObservationStatus::Amended);
        assert!(matches!(changed.value, Some(ObservationValue::String(_))));
        assert!(changed.value_quantity().is_none());
    }

    #[test]
    fn test_with_json_null_removes_only_that_member() {
        let observation = ObservationBuilder::new(ObservationStatus::Final, Coding::new(LOINC, "8867-4"))
            .set_value(ObservationValue::Quantity(Quantity::ucum(Decimal::new(725, 1), "/min")))
            .build();

        let changed = observation.with_json(&json!({"valueString": null})).unwrap();
        assert_eq!(changed, observation);
        assert_eq!(changed.value_quantity().unwrap().value, Some(Decimal::new(725, 1)));

        let cleared = observation.with_json(&json!({"valueQuantity": null})).unwrap();
        assert!(cleared.value.is_none());
    }

    #[test]
    fn test_builder_replaces_variant() {
        let observation = ObservationBuilder::new(ObservationStatus::Preliminary, CodeableConcept::from_text("x"))
            .set_value(ObservationValue::Integer(4.into()))
            .set_value(ObservationValue::Boolean(true.into()))
            .add_component(
                ObservationComponentBuilder::new(Coding::new(LOINC, "8462-4"))
                    .set_value(ObservationComponentValue::Quantity(Quantity::ucum(Decimal::new(605, 1), "mm[Hg]")))
                    .build(),
            )
            .build();

        let json = observation.to_json().unwrap();
        assert_eq!(json["valueBoolean"], true);
        assert!(json.get("valueInteger").is_none());
        assert_eq!(json["component"][0]["valueQuantity"]["value"], 60.5);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Observation::from_json(&blood_pressure()).unwrap();
        let mut copy = original.clone();
        copy.component.as_mut().unwrap()[0].code = CodeableConcept::from_text("changed");

        assert!(original.component_by_code(LOINC, "8480-6").is_some());
        assert!(copy.component_by_code(LOINC, "8480-6").is_none());
    }
}
