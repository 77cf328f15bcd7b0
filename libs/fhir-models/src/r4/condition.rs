//! Condition (R4)

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

/// A clinical condition, problem, diagnosis, or other event, situation, issue, or clinical concept
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

    /// active | recurrence | relapse | inactive | remission | resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical_status: Option<CodeableConcept>,

    /// unconfirmed | provisional | differential | confirmed | refuted | entered-in-error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<CodeableConcept>>,

    /// Subjective severity of condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<CodeableConcept>,

    /// Identification of the condition, problem or diagnosis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<Vec<CodeableConcept>>,

    /// Who has the condition?
    pub subject: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Reference>,

    /// Estimated or actual date,  date-time, or age
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub onset: Option<ConditionOnset>,

    /// When in resolution/remission
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub abatement: Option<ConditionAbatement>,

    /// Date record was first recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_date: Option<String>,

    #[serde(rename = "_recordedDate", skip_serializing_if = "Option::is_none")]
    pub recorded_date_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorder: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asserter: Option<Reference>,

    /// Stage/grade, usually assessed formally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Vec<ConditionStage>>,

    /// Supporting evidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Vec<ConditionEvidence>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<Vec<Annotation>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Condition {
    pub fn new(subject: impl Into<Reference>) -> Self {
        Self {
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
        set set_clinical_status(clinical_status: CodeableConcept);
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
        set set_recorder(recorder: Reference);
        set set_asserter(asserter: Reference);
        add add_stage(stage: ConditionStage);
        add add_evidence(evidence: ConditionEvidence);
        add add_note(note: Annotation);
    }
}

impl ConditionBuilder {
    pub fn new(subject: impl Into<Reference>) -> Self {
        Self::from(Condition::new(subject))
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

    /// Simple summary (disease specific)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<CodeableConcept>,

    /// Formal record of assessment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Vec<Reference>>,

    /// Kind of staging
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

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionEvidence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Manifestation/symptom
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<Vec<CodeableConcept>>,

    /// Supporting information found elsewhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(ConditionEvidence, "Condition.evidence");
crate::impl_backbone_element!(ConditionEvidence);

crate::model_builder! {
    pub struct ConditionEvidenceBuilder => ConditionEvidence {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_code(code: CodeableConcept);
        add add_detail(detail: Reference);
    }
}

const CLINICAL_STATUS_SYSTEM: &str = "http://terminology.hl7.org/CodeSystem/condition-clinical";

impl Condition {
    /// `true` when the clinical status is active, recurrence or relapse
    pub fn is_active(&self) -> bool {
        self.clinical_status.as_ref().is_some_and(|status| {
            ["active", "recurrence", "relapse"]
                .iter()
                .any(|code| status.has_coding(CLINICAL_STATUS_SYSTEM, code))
        })
    }
}
