//! Condition (R5)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

crate::choice_type! {
    /// Condition.onset[x]
    pub enum ConditionOnset("onset") {
        DateTime(Primitive<String>),
        Age(Age),
        Period(Period),
        Range(Range),
        String(Primitive<String>),
    }
}

crate::choice_type! {
    /// Condition.abatement[x]
    pub enum ConditionAbatement("abatement") {
        DateTime(Primitive<String>),
        Age(Age),
        Period(Period),
        Range(Range),
        String(Primitive<String>),
    }
}

/// Detailed information about conditions, problems or diagnoses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub resource_type: ResourceTag<Condition>,

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

    /// active | recurrence | relapse | inactive | remission | resolved | unknown
    pub clinical_status: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<Vec<CodeableConcept>>,

    pub subject: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub onset: Option<ConditionOnset>,

    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub abatement: Option<ConditionAbatement>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<String>,

    #[serde(rename = "_recordedDate", skip_serializing_if = "Option::is_none")]
    pub recorded_date_ext: Option<Element>,

    /// Who or what participated in the activities related to the condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<Vec<ConditionParticipant>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Vec<ConditionStage>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    /// Supporting evidence for the verification status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<CodeableReference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Condition {
    pub fn new(clinical_status: impl Into<CodeableConcept>, subject: impl Into<Reference>) -> Self {
        Self {
            clinical_status: clinical_status.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Condition, "Condition", choices = [ConditionOnset, ConditionAbatement]);
crate::impl_domain_resource!(Condition, "Condition", contained = Resource);

crate::model_builder! {
    pub struct ConditionBuilder => Condition {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        req set_clinical_status(clinical_status: CodeableConcept);
        set set_verification_status(verification_status: CodeableConcept);
        add add_category(category: CodeableConcept);
        set set_severity(severity: CodeableConcept);
        set set_code(code: CodeableConcept);
        add add_body_site(body_site: CodeableConcept);
        req set_subject(subject: Reference);
        set set_encounter(encounter: Reference);
        set set_onset(onset: ConditionOnset);
        set set_abatement(abatement: ConditionAbatement);
        set set_recorded_date(recorded_date: String);
        add add_participant(participant: ConditionParticipant);
        add add_stage(stage: ConditionStage);
        add add_note(note: Annotation);
        add add_evidence(evidence: CodeableReference);
    }
}

impl ConditionBuilder {
    pub fn new(clinical_status: impl Into<CodeableConcept>, subject: impl Into<Reference>) -> Self {
        Self::from(Condition::new(clinical_status, subject))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionParticipant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Type of involvement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<CodeableConcept>,

    pub actor: Reference,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ConditionParticipant {
    pub fn new(actor: impl Into<Reference>) -> Self {
        Self {
            actor: actor.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ConditionParticipant, "Condition.participant");
crate::impl_backbone_element!(ConditionParticipant);

crate::model_builder! {
    pub struct ConditionParticipantBuilder => ConditionParticipant {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_function(function: CodeableConcept);
        req set_actor(actor: Reference);
    }
}

impl ConditionParticipantBuilder {
    pub fn new(actor: impl Into<Reference>) -> Self {
        Self::from(ConditionParticipant::new(actor))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionStage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Vec<Reference>>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(ConditionStage, "Condition.stage");
crate::impl_backbone_element!(ConditionStage);

crate::model_builder! {
    pub struct ConditionStageBuilder => ConditionStage {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_summary(summary: CodeableConcept);
        add add_assessment(assessment: Reference);
        set set_type(type_: CodeableConcept);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip() {
        let json = json!({
            "resourceType": "Condition",
            "clinicalStatus": {"coding": [{"code": "active"}]},
            "code": {"text": "Burn of ear"},
            "subject": {"reference": "Patient/example"},
            "onsetDateTime": "2012-05-24",
            "participant": [{
                "function": {"text": "asserter"},
                "actor": {"reference": "Practitioner/f201"}
            }],
            "evidence": [{"concept": {"text": "pain"}}]
        });
        let condition = Condition::from_json(&json).unwrap();

        assert_eq!(condition.participant.as_ref().unwrap()[0].actor.reference.as_deref(), Some("Practitioner/f201"));
        assert!(condition.evidence.as_ref().unwrap()[0].concept.is_some());
        assert_eq!(condition.to_json().unwrap(), json);
    }

    #[test]
    fn test_clinical_status_required() {
        let json = json!({"resourceType": "Condition", "subject": {"reference": "Patient/1"}});
        assert!(Condition::from_json(&json).is_err());

        let condition = ConditionBuilder::new(CodeableConcept::from_text("active"), Reference::to("Patient/1")).build();
        assert_eq!(condition.to_json().unwrap()["clinicalStatus"]["text"], "active");
    }
}
