//! Claim (R4)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

/// Status of a financial resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinancialResourceStatus {
    #[default]
    Active,
    Cancelled,
    Draft,
    EnteredInError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimUse {
    #[default]
    Claim,
    Preauthorization,
    Predetermination,
}

/// Claim, Pre-determination or Pre-authorization
///
/// A provider issued list of professional services and products which have been
/// provided, or are to be provided, to a patient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    #[serde(default)]
    pub resource_type: ResourceTag<Claim>,

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

    /// Business Identifier for claim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// active | cancelled | draft | entered-in-error
    pub status: FinancialResourceStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// Category or discipline
    #[serde(rename = "type")]
    pub type_: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<CodeableConcept>,

    /// claim | preauthorization | predetermination
    #[serde(rename = "use")]
    pub use_: ClaimUse,

    #[serde(rename = "_use", skip_serializing_if = "Option::is_none")]
    pub use_ext: Option<Element>,

    /// The recipient of the products and services
    pub patient: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub billable_period: Option<Period>,

    /// Resource creation date
    pub created: String,

    #[serde(rename = "_created", skip_serializing_if = "Option::is_none")]
    pub created_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterer: Option<Reference>,

    /// Target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurer: Option<Reference>,

    /// Party responsible for the claim
    pub provider: Reference,

    /// Desired processing ugency
    pub priority: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds_reserve: Option<CodeableConcept>,

    /// Prior or corollary claims
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<ClaimRelated>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_prescription: Option<Reference>,

    /// Recipient of benefits payable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee: Option<ClaimPayee>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral: Option<Reference>,

    /// Servicing facility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<Reference>,

    /// Members of the care team
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_team: Option<Vec<ClaimCareTeam>>,

    /// Supporting information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supporting_info: Option<Vec<ClaimSupportingInfo>>,

    /// Pertinent diagnosis information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Vec<ClaimDiagnosis>>,

    /// Clinical procedures performed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure: Option<Vec<ClaimProcedure>>,

    /// Patient insurance information
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insurance: Vec<ClaimInsurance>,

    /// Details of the event
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accident: Option<ClaimAccident>,

    /// Product or service provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Vec<ClaimItem>>,

    /// Total claim cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Claim {
    pub fn new(
        status: FinancialResourceStatus,
        type_: impl Into<CodeableConcept>,
        use_: ClaimUse,
        patient: impl Into<Reference>,
        created: impl Into<String>,
        provider: impl Into<Reference>,
        priority: impl Into<CodeableConcept>,
    ) -> Self {
        Self {
            status,
            type_: type_.into(),
            use_,
            patient: patient.into(),
            created: created.into(),
            provider: provider.into(),
            priority: priority.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Claim, "Claim");
crate::impl_domain_resource!(Claim, "Claim", contained = Resource);

crate::model_builder! {
    pub struct ClaimBuilder => Claim {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        req set_status(status: FinancialResourceStatus);
        req set_type(type_: CodeableConcept);
        set set_sub_type(sub_type: CodeableConcept);
        req set_use(use_: ClaimUse);
        req set_patient(patient: Reference);
        set set_billable_period(billable_period: Period);
        req set_created(created: String);
        set set_enterer(enterer: Reference);
        set set_insurer(insurer: Reference);
        req set_provider(provider: Reference);
        req set_priority(priority: CodeableConcept);
        set set_funds_reserve(funds_reserve: CodeableConcept);
        add add_related(related: ClaimRelated);
        set set_prescription(prescription: Reference);
        set set_original_prescription(original_prescription: Reference);
        set set_payee(payee: ClaimPayee);
        set set_referral(referral: Reference);
        set set_facility(facility: Reference);
        add add_care_team(care_team: ClaimCareTeam);
        add add_supporting_info(supporting_info: ClaimSupportingInfo);
        add add_diagnosis(diagnosis: ClaimDiagnosis);
        add add_procedure(procedure: ClaimProcedure);
        push add_insurance(insurance: ClaimInsurance);
        set set_accident(accident: ClaimAccident);
        add add_item(item: ClaimItem);
        set set_total(total: Money);
    }
}

impl ClaimBuilder {
    pub fn new(
        status: FinancialResourceStatus,
        type_: impl Into<CodeableConcept>,
        use_: ClaimUse,
        patient: impl Into<Reference>,
        created: impl Into<String>,
        provider: impl Into<Reference>,
        priority: impl Into<CodeableConcept>,
    ) -> Self {
        Self::from(Claim::new(status, type_, use_, patient, created, provider, priority))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRelated {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Reference to the related claim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<CodeableConcept>,

    /// File or case reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Identifier>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(ClaimRelated, "Claim.related");
crate::impl_backbone_element!(ClaimRelated);

crate::model_builder! {
    pub struct ClaimRelatedBuilder => ClaimRelated {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_claim(claim: Reference);
        set set_relationship(relationship: CodeableConcept);
        set set_reference(reference: Identifier);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimPayee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Category of recipient
    #[serde(rename = "type")]
    pub type_: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub party: Option<Reference>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimPayee {
    pub fn new(type_: impl Into<CodeableConcept>) -> Self {
        Self {
            type_: type_.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimPayee, "Claim.payee");
crate::impl_backbone_element!(ClaimPayee);

crate::model_builder! {
    pub struct ClaimPayeeBuilder => ClaimPayee {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_type(type_: CodeableConcept);
        set set_party(party: Reference);
    }
}

impl ClaimPayeeBuilder {
    pub fn new(type_: impl Into<CodeableConcept>) -> Self {
        Self::from(ClaimPayee::new(type_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimCareTeam {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Order of care team
    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Practitioner or organization
    pub provider: Reference,

    /// Indicator of the lead practitioner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<bool>,

    #[serde(rename = "_responsible", skip_serializing_if = "Option::is_none")]
    pub responsible_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimCareTeam {
    pub fn new(sequence: u32, provider: impl Into<Reference>) -> Self {
        Self {
            sequence,
            provider: provider.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimCareTeam, "Claim.careTeam");
crate::impl_backbone_element!(ClaimCareTeam);

crate::model_builder! {
    pub struct ClaimCareTeamBuilder => ClaimCareTeam {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        req set_provider(provider: Reference);
        set set_responsible(responsible: bool);
        set set_role(role: CodeableConcept);
        set set_qualification(qualification: CodeableConcept);
    }
}

impl ClaimCareTeamBuilder {
    pub fn new(sequence: u32, provider: impl Into<Reference>) -> Self {
        Self::from(ClaimCareTeam::new(sequence, provider))
    }
}

crate::choice_type! {
    /// Claim.supportingInfo.timing[x]
    pub enum ClaimSupportingInfoTiming("timing") {
        Date(Primitive<String>),
        Period(Period),
    }
}

crate::choice_type! {
    /// Claim.supportingInfo.value[x]
    pub enum ClaimSupportingInfoValue("value") {
        Boolean(Primitive<bool>),
        String(Primitive<String>),
        Quantity(Quantity),
        Attachment(Attachment),
        Reference(Reference),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSupportingInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Information instance identifier
    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Classification of the supplied information
    pub category: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,

    /// When it occurred
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub timing: Option<ClaimSupportingInfoTiming>,

    /// Data to be provided
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub value: Option<ClaimSupportingInfoValue>,

    /// Explanation for the information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimSupportingInfo {
    pub fn new(sequence: u32, category: impl Into<CodeableConcept>) -> Self {
        Self {
            sequence,
            category: category.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(
    ClaimSupportingInfo,
    "Claim.supportingInfo",
    choices = [ClaimSupportingInfoTiming, ClaimSupportingInfoValue]
);
crate::impl_backbone_element!(ClaimSupportingInfo);

crate::model_builder! {
    pub struct ClaimSupportingInfoBuilder => ClaimSupportingInfo {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        req set_category(category: CodeableConcept);
        set set_code(code: CodeableConcept);
        set set_timing(timing: ClaimSupportingInfoTiming);
        set set_value(value: ClaimSupportingInfoValue);
        set set_reason(reason: CodeableConcept);
    }
}

impl ClaimSupportingInfoBuilder {
    pub fn new(sequence: u32, category: impl Into<CodeableConcept>) -> Self {
        Self::from(ClaimSupportingInfo::new(sequence, category))
    }
}

crate::choice_type! {
    /// Claim.diagnosis.diagnosis[x]
    pub enum ClaimDiagnosisDiagnosis("diagnosis") {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDiagnosis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Nature of illness or problem
    #[serde(flatten)]
    pub diagnosis: ClaimDiagnosisDiagnosis,

    /// Timing or nature of the diagnosis
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_admission: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_code: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Default for ClaimDiagnosis {
    fn default() -> Self {
        Self {
            id: Default::default(),
            extension: Default::default(),
            modifier_extension: Default::default(),
            sequence: Default::default(),
            sequence_ext: None,
            diagnosis: ClaimDiagnosisDiagnosis::CodeableConcept(Default::default()),
            type_: Default::default(),
            on_admission: Default::default(),
            package_code: Default::default(),
            additional: Map::new(),
        }
    }
}

impl ClaimDiagnosis {
    pub fn new(sequence: u32, diagnosis: ClaimDiagnosisDiagnosis) -> Self {
        Self {
            sequence,
            diagnosis,
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimDiagnosis, "Claim.diagnosis", choices = [ClaimDiagnosisDiagnosis]);
crate::impl_backbone_element!(ClaimDiagnosis);

crate::model_builder! {
    pub struct ClaimDiagnosisBuilder => ClaimDiagnosis {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        req set_diagnosis(diagnosis: ClaimDiagnosisDiagnosis);
        add add_type(type_: CodeableConcept);
        set set_on_admission(on_admission: CodeableConcept);
        set set_package_code(package_code: CodeableConcept);
    }
}

impl ClaimDiagnosisBuilder {
    pub fn new(sequence: u32, diagnosis: ClaimDiagnosisDiagnosis) -> Self {
        Self::from(ClaimDiagnosis::new(sequence, diagnosis))
    }
}

crate::choice_type! {
    /// Claim.procedure.procedure[x]
    pub enum ClaimProcedureProcedure("procedure") {
        CodeableConcept(CodeableConcept),
        Reference(Reference),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimProcedure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<CodeableConcept>>,

    /// When the procedure was performed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(rename = "_date", skip_serializing_if = "Option::is_none")]
    pub date_ext: Option<Element>,

    /// Specific clinical procedure
    #[serde(flatten)]
    pub procedure: ClaimProcedureProcedure,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udi: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Default for ClaimProcedure {
    fn default() -> Self {
        Self {
            id: Default::default(),
            extension: Default::default(),
            modifier_extension: Default::default(),
            sequence: Default::default(),
            sequence_ext: None,
            type_: Default::default(),
            date: Default::default(),
            date_ext: None,
            procedure: ClaimProcedureProcedure::CodeableConcept(Default::default()),
            udi: Default::default(),
            additional: Map::new(),
        }
    }
}

impl ClaimProcedure {
    pub fn new(sequence: u32, procedure: ClaimProcedureProcedure) -> Self {
        Self {
            sequence,
            procedure,
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimProcedure, "Claim.procedure", choices = [ClaimProcedureProcedure]);
crate::impl_backbone_element!(ClaimProcedure);

crate::model_builder! {
    pub struct ClaimProcedureBuilder => ClaimProcedure {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        add add_type(type_: CodeableConcept);
        set set_date(date: String);
        req set_procedure(procedure: ClaimProcedureProcedure);
        add add_udi(udi: Reference);
    }
}

impl ClaimProcedureBuilder {
    pub fn new(sequence: u32, procedure: ClaimProcedureProcedure) -> Self {
        Self::from(ClaimProcedure::new(sequence, procedure))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimInsurance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Insurance instance identifier
    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Coverage to be used for adjudication
    pub focal: bool,

    #[serde(rename = "_focal", skip_serializing_if = "Option::is_none")]
    pub focal_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,

    /// Insurance information
    pub coverage: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_arrangement: Option<String>,

    #[serde(rename = "_businessArrangement", skip_serializing_if = "Option::is_none")]
    pub business_arrangement_ext: Option<Element>,

    /// Prior authorization reference number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_auth_ref: Option<Vec<String>>,

    #[serde(rename = "_preAuthRef", skip_serializing_if = "Option::is_none")]
    pub pre_auth_ref_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_response: Option<Reference>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimInsurance {
    pub fn new(sequence: u32, focal: bool, coverage: impl Into<Reference>) -> Self {
        Self {
            sequence,
            focal,
            coverage: coverage.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimInsurance, "Claim.insurance");
crate::impl_backbone_element!(ClaimInsurance);

crate::model_builder! {
    pub struct ClaimInsuranceBuilder => ClaimInsurance {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        req set_focal(focal: bool);
        set set_identifier(identifier: Identifier);
        req set_coverage(coverage: Reference);
        set set_business_arrangement(business_arrangement: String);
        add add_pre_auth_ref(pre_auth_ref: String);
        set set_claim_response(claim_response: Reference);
    }
}

impl ClaimInsuranceBuilder {
    pub fn new(sequence: u32, focal: bool, coverage: impl Into<Reference>) -> Self {
        Self::from(ClaimInsurance::new(sequence, focal, coverage))
    }
}

crate::choice_type! {
    /// Claim.accident.location[x]
    pub enum ClaimAccidentLocation("location") {
        Address(Address),
        Reference(Reference),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimAccident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// When the incident occurred
    pub date: String,

    #[serde(rename = "_date", skip_serializing_if = "Option::is_none")]
    pub date_ext: Option<Element>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,

    /// Where the event occurred
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub location: Option<ClaimAccidentLocation>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimAccident {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimAccident, "Claim.accident", choices = [ClaimAccidentLocation]);
crate::impl_backbone_element!(ClaimAccident);

crate::model_builder! {
    pub struct ClaimAccidentBuilder => ClaimAccident {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_date(date: String);
        set set_type(type_: CodeableConcept);
        set set_location(location: ClaimAccidentLocation);
    }
}

impl ClaimAccidentBuilder {
    pub fn new(date: impl Into<String>) -> Self {
        Self::from(ClaimAccident::new(date))
    }
}

crate::choice_type! {
    /// Claim.item.serviced[x]
    pub enum ClaimItemServiced("serviced") {
        Date(Primitive<String>),
        Period(Period),
    }
}

crate::choice_type! {
    /// Claim.item.location[x]
    pub enum ClaimItemLocation("location") {
        CodeableConcept(CodeableConcept),
        Address(Address),
        Reference(Reference),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Item instance identifier
    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Applicable careTeam members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_team_sequence: Option<Vec<u32>>,

    #[serde(rename = "_careTeamSequence", skip_serializing_if = "Option::is_none")]
    pub care_team_sequence_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_sequence: Option<Vec<u32>>,

    #[serde(rename = "_diagnosisSequence", skip_serializing_if = "Option::is_none")]
    pub diagnosis_sequence_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub procedure_sequence: Option<Vec<u32>>,

    #[serde(rename = "_procedureSequence", skip_serializing_if = "Option::is_none")]
    pub procedure_sequence_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub information_sequence: Option<Vec<u32>>,

    #[serde(rename = "_informationSequence", skip_serializing_if = "Option::is_none")]
    pub information_sequence_ext: Option<Vec<Option<Element>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,

    /// Billing, service, product, or drug code
    pub product_or_service: CodeableConcept,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_code: Option<Vec<CodeableConcept>>,

    /// Date or dates of service or product delivery
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub serviced: Option<ClaimItemServiced>,

    /// Place of service or where product was supplied
    #[serde(flatten, deserialize_with = "crate::choice::optional")]
    pub location: Option<ClaimItemLocation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<Decimal>,

    #[serde(rename = "_factor", skip_serializing_if = "Option::is_none")]
    pub factor_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Money>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub udi: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_site: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_site: Option<Vec<CodeableConcept>>,

    /// Encounters related to this billed item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encounter: Option<Vec<Reference>>,

    /// Product or service provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Vec<ClaimItemDetail>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimItem {
    pub fn new(sequence: u32, product_or_service: impl Into<CodeableConcept>) -> Self {
        Self {
            sequence,
            product_or_service: product_or_service.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimItem, "Claim.item", choices = [ClaimItemServiced, ClaimItemLocation]);
crate::impl_backbone_element!(ClaimItem);

crate::model_builder! {
    pub struct ClaimItemBuilder => ClaimItem {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        add add_care_team_sequence(care_team_sequence: u32);
        add add_diagnosis_sequence(diagnosis_sequence: u32);
        add add_procedure_sequence(procedure_sequence: u32);
        add add_information_sequence(information_sequence: u32);
        set set_revenue(revenue: CodeableConcept);
        set set_category(category: CodeableConcept);
        req set_product_or_service(product_or_service: CodeableConcept);
        add add_modifier(modifier: CodeableConcept);
        add add_program_code(program_code: CodeableConcept);
        set set_serviced(serviced: ClaimItemServiced);
        set set_location(location: ClaimItemLocation);
        set set_quantity(quantity: SimpleQuantity);
        set set_unit_price(unit_price: Money);
        set set_factor(factor: Decimal);
        set set_net(net: Money);
        add add_udi(udi: Reference);
        set set_body_site(body_site: CodeableConcept);
        add add_sub_site(sub_site: CodeableConcept);
        add add_encounter(encounter: Reference);
        add add_detail(detail: ClaimItemDetail);
    }
}

impl ClaimItemBuilder {
    pub fn new(sequence: u32, product_or_service: impl Into<CodeableConcept>) -> Self {
        Self::from(ClaimItem::new(sequence, product_or_service))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItemDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Item instance identifier
    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Revenue or cost center code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<CodeableConcept>,

    /// Benefit classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,

    /// Billing, service, product, or drug code
    pub product_or_service: CodeableConcept,

    /// Service/Product billing modifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_code: Option<Vec<CodeableConcept>>,

    /// Count of products or services
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    /// Fee, charge or cost per item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,

    /// Price scaling factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<Decimal>,

    #[serde(rename = "_factor", skip_serializing_if = "Option::is_none")]
    pub factor_ext: Option<Element>,

    /// Total item cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Money>,

    /// Unique device identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udi: Option<Vec<Reference>>,

    /// Product or service provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_detail: Option<Vec<ClaimItemDetailSubDetail>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimItemDetail {
    pub fn new(sequence: u32, product_or_service: impl Into<CodeableConcept>) -> Self {
        Self {
            sequence,
            product_or_service: product_or_service.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimItemDetail, "Claim.item.detail");
crate::impl_backbone_element!(ClaimItemDetail);

crate::model_builder! {
    pub struct ClaimItemDetailBuilder => ClaimItemDetail {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        set set_revenue(revenue: CodeableConcept);
        set set_category(category: CodeableConcept);
        req set_product_or_service(product_or_service: CodeableConcept);
        add add_modifier(modifier: CodeableConcept);
        add add_program_code(program_code: CodeableConcept);
        set set_quantity(quantity: SimpleQuantity);
        set set_unit_price(unit_price: Money);
        set set_factor(factor: Decimal);
        set set_net(net: Money);
        add add_udi(udi: Reference);
        add add_sub_detail(sub_detail: ClaimItemDetailSubDetail);
    }
}

impl ClaimItemDetailBuilder {
    pub fn new(sequence: u32, product_or_service: impl Into<CodeableConcept>) -> Self {
        Self::from(ClaimItemDetail::new(sequence, product_or_service))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimItemDetailSubDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Item instance identifier
    pub sequence: u32,

    #[serde(rename = "_sequence", skip_serializing_if = "Option::is_none")]
    pub sequence_ext: Option<Element>,

    /// Revenue or cost center code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<CodeableConcept>,

    /// Benefit classification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,

    /// Billing, service, product, or drug code
    pub product_or_service: CodeableConcept,

    /// Service/Product billing modifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_code: Option<Vec<CodeableConcept>>,

    /// Count of products or services
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<SimpleQuantity>,

    /// Fee, charge or cost per item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,

    /// Price scaling factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<Decimal>,

    #[serde(rename = "_factor", skip_serializing_if = "Option::is_none")]
    pub factor_ext: Option<Element>,

    /// Total item cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Money>,

    /// Unique device identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udi: Option<Vec<Reference>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl ClaimItemDetailSubDetail {
    pub fn new(sequence: u32, product_or_service: impl Into<CodeableConcept>) -> Self {
        Self {
            sequence,
            product_or_service: product_or_service.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(ClaimItemDetailSubDetail, "Claim.item.detail.subDetail");
crate::impl_backbone_element!(ClaimItemDetailSubDetail);

crate::model_builder! {
    pub struct ClaimItemDetailSubDetailBuilder => ClaimItemDetailSubDetail {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_sequence(sequence: u32);
        set set_revenue(revenue: CodeableConcept);
        set set_category(category: CodeableConcept);
        req set_product_or_service(product_or_service: CodeableConcept);
        add add_modifier(modifier: CodeableConcept);
        add add_program_code(program_code: CodeableConcept);
        set set_quantity(quantity: SimpleQuantity);
        set set_unit_price(unit_price: Money);
        set set_factor(factor: Decimal);
        set set_net(net: Money);
        add add_udi(udi: Reference);
    }
}

impl ClaimItemDetailSubDetailBuilder {
    pub fn new(sequence: u32, product_or_service: impl Into<CodeableConcept>) -> Self {
        Self::from(ClaimItemDetailSubDetail::new(sequence, product_or_service))
    }
}

impl Claim {
    /// Sum of `item.net` values, when every priced item shares one currency
    pub fn net_total(&self) -> Option<Money> {
        let mut total: Option<Money> = None;
        for net in self.item.iter().flatten().filter_map(|item| item.net.as_ref()) {
            let value = net.value.unwrap_or_default();
            match total.as_mut() {
                None => total = Some(Money::new(value, net.currency.clone().unwrap_or_default())),
                Some(sum) if sum.currency == net.currency => {
                    sum.value = Some(sum.value.unwrap_or_default() + value);
                }
                Some(_) => return None,
            }
        }
        total
    }

    pub fn focal_insurance(&self) -> Option<&ClaimInsurance> {
        self.insurance.iter().find(|i| i.focal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example() -> Value {
        json!({
            "resourceType": "Claim",
            "id": "100150",
            "status": "active",
            "type": {"coding": [{"system": "http://terminology.hl7.org/CodeSystem/claim-type", "code": "oral"}]},
            "use": "claim",
            "patient": {"reference": "Patient/1"},
            "created": "2014-08-16",
            "insurer": {"reference": "Organization/2"},
            "provider": {"reference": "Organization/1"},
            "priority": {"coding": [{"code": "normal"}]},
            "payee": {"type": {"coding": [{"code": "provider"}]}},
            "careTeam": [{"sequence": 1, "provider": {"reference": "Practitioner/example"}}],
            "diagnosis": [{"sequence": 1, "diagnosisCodeableConcept": {"coding": [{"code": "123456"}]}}],
            "insurance": [{"sequence": 1, "focal": true, "coverage": {"reference": "Coverage/9876B1"}}],
            "accident": {"date": "2014-07-09", "locationReference": {"reference": "Location/1"}},
            "item": [
                {
                    "sequence": 1,
                    "careTeamSequence": [1],
                    "productOrService": {"coding": [{"code": "1200"}]},
                    "servicedDate": "2014-08-16",
                    "unitPrice": {"value": 135.57, "currency": "USD"},
                    "net": {"value": 135.57, "currency": "USD"},
                    "detail": [{
                        "sequence": 1,
                        "productOrService": {"text": "lab"},
                        "factor": 0.75,
                        "subDetail": [{"sequence": 1, "productOrService": {"text": "panel"}}]
                    }]
                },
                {
                    "sequence": 2,
                    "productOrService": {"coding": [{"code": "1205"}]},
                    "locationCodeableConcept": {"text": "office"},
                    "net": {"value": 20.5, "currency": "USD"}
                }
            ]
        })
    }

    #[test]
    fn test_roundtrip_nested_backbones() {
        let json = example();
        let claim = Claim::from_json(&json).unwrap();

        assert_eq!(claim.use_, ClaimUse::Claim);
        let item = &claim.item.as_ref().unwrap()[0];
        let detail = &item.detail.as_ref().unwrap()[0];
        assert_eq!(detail.factor, Some(Decimal::new(75, 2)));
        assert_eq!(detail.sub_detail.as_ref().unwrap()[0].sequence, 1);
        assert!(matches!(item.serviced, Some(ClaimItemServiced::Date(_))));
        assert!(matches!(
            claim.accident.as_ref().unwrap().location,
            Some(ClaimAccidentLocation::Reference(_))
        ));
        assert_eq!(claim.to_json().unwrap(), json);
    }

    #[test]
    fn test_required_choice_missing() {
        let mut json = example();
        json["diagnosis"] = json!([{"sequence": 1}]);
        assert!(Claim::from_json(&json).is_err());
    }

    #[test]
    fn test_net_total() {
        let claim = Claim::from_json(&example()).unwrap();
        let total = claim.net_total().unwrap();
        assert_eq!(total.currency.as_deref(), Some("USD"));
        assert_eq!(total.value.unwrap().to_string(), "156.07");
        assert_eq!(claim.focal_insurance().unwrap().sequence, 1);
    }

    #[test]
    fn test_net_total_mixed_currency() {
        let claim = Claim::from_json(&example()).unwrap().with(|c| {
            c.item.as_mut().unwrap()[1].net = Some(Money::new(Decimal::new(35, 1), "EUR"));
        });
        assert!(claim.net_total().is_none());
    }

    #[test]
    fn test_builder() {
        let claim = ClaimBuilder::new(
            FinancialResourceStatus::Draft,
            CodeableConcept::from_text("oral"),
            ClaimUse::Preauthorization,
            Reference::to("Patient/1"),
            "2024-05-01",
            Reference::to("Organization/1"),
            CodeableConcept::from_text("normal"),
        )
        .add_insurance(ClaimInsurance::new(1, true, Reference::to("Coverage/1")))
        .add_diagnosis(ClaimDiagnosis::new(
            1,
            ClaimDiagnosisDiagnosis::Reference(Reference::to("Condition/1")),
        ))
        .add_item(
            ClaimItemBuilder::new(1, CodeableConcept::from_text("exam"))
                .add_detail(ClaimItemDetail::new(1, CodeableConcept::from_text("x-ray")))
                .build(),
        )
        .build();

        let json = claim.to_json().unwrap();
        assert_eq!(json["use"], "preauthorization");
        assert_eq!(json["status"], "draft");
        assert_eq!(json["diagnosis"][0]["diagnosisReference"]["reference"], "Condition/1");
        assert_eq!(json["item"][0]["detail"][0]["productOrService"]["text"], "x-ray");
    }

    #[test]
    fn test_empty_required_array_omitted() {
        let claim = Claim::default();
        let json = claim.to_json().unwrap();
        assert!(json.get("insurance").is_none());
        assert_eq!(Claim::from_json(&json).unwrap(), claim);
    }
}
