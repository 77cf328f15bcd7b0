//! Encounter (R4)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

/// Current state of the encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncounterStatus {
    #[default]
    Planned,
    Arrived,
    Triaged,
    InProgress,
    Onleave,
    Finished,
    Cancelled,
    EnteredInError,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncounterLocationStatus {
    Planned,
    Active,
    Reserved,
    Completed,
}

/// An interaction during which services are provided to the patient
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    #[serde(default)]
    pub resource_type: ResourceTag<Encounter>,

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

    /// Identifier(s) by which this encounter is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Vec<Identifier>>,

    /// planned | arrived | triaged | in-progress | onleave | finished | cancelled +
    pub status: EncounterStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// List of past encounter statuses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_history: Option<Vec<EncounterStatusHistory>>,

    /// Classification of patient encounter
    #[serde(rename = "class")]
    pub class_: Coding,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_history: Option<Vec<EncounterClassHistory>>,

    /// Specific type of encounter
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<CodeableConcept>,

    /// Indicates the urgency of the encounter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<CodeableConcept>,

    /// The patient or group present at the encounter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_of_care: Option<Vec<Reference>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub based_on: Option<Vec<Reference>>,

    /// List of participants involved in the encounter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<Vec<EncounterParticipant>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Vec<Reference>>,

    /// The start and end time of the encounter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// Quantity of time the encounter lasted (less time absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Duration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_reference: Option<Vec<Reference>>,

    /// The list of diagnosis relevant to this encounter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<Vec<EncounterDiagnosis>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Vec<Reference>>,

    /// Details about the admission to a healthcare service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospitalization: Option<EncounterHospitalization>,

    /// List of locations where the patient has been
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<EncounterLocation>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_provider: Option<Reference>,

    /// Another Encounter this encounter is part of
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<Reference>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl Encounter {
    pub fn new(status: EncounterStatus, class_: impl Into<Coding>) -> Self {
        Self {
            status,
            class_: class_.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(Encounter, "Encounter");
crate::impl_domain_resource!(Encounter, "Encounter", contained = Resource);

crate::model_builder! {
    pub struct EncounterBuilder => Encounter {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_identifier(identifier: Identifier);
        req set_status(status: EncounterStatus);
        add add_status_history(status_history: EncounterStatusHistory);
        req set_class(class_: Coding);
        add add_class_history(class_history: EncounterClassHistory);
        add add_type(type_: CodeableConcept);
        set set_service_type(service_type: CodeableConcept);
        set set_priority(priority: CodeableConcept);
        set set_subject(subject: Reference);
        add add_episode_of_care(episode_of_care: Reference);
        add add_based_on(based_on: Reference);
        add add_participant(participant: EncounterParticipant);
        add add_appointment(appointment: Reference);
        set set_period(period: Period);
        set set_length(length: Duration);
        add add_reason_code(reason_code: CodeableConcept);
        add add_reason_reference(reason_reference: Reference);
        add add_diagnosis(diagnosis: EncounterDiagnosis);
        add add_account(account: Reference);
        set set_hospitalization(hospitalization: EncounterHospitalization);
        add add_location(location: EncounterLocation);
        set set_service_provider(service_provider: Reference);
        set set_part_of(part_of: Reference);
    }
}

impl EncounterBuilder {
    pub fn new(status: EncounterStatus, class_: impl Into<Coding>) -> Self {
        Self::from(Encounter::new(status, class_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterStatusHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    pub status: EncounterStatus,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    /// The time that the episode was in the specified status
    pub period: Period,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl EncounterStatusHistory {
    pub fn new(status: EncounterStatus, period: impl Into<Period>) -> Self {
        Self {
            status,
            period: period.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(EncounterStatusHistory, "Encounter.statusHistory");
crate::impl_backbone_element!(EncounterStatusHistory);

crate::model_builder! {
    pub struct EncounterStatusHistoryBuilder => EncounterStatusHistory {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_status(status: EncounterStatus);
        req set_period(period: Period);
    }
}

impl EncounterStatusHistoryBuilder {
    pub fn new(status: EncounterStatus, period: impl Into<Period>) -> Self {
        Self::from(EncounterStatusHistory::new(status, period))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterClassHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// inpatient | outpatient | ambulatory | emergency +
    #[serde(rename = "class")]
    pub class_: Coding,

    pub period: Period,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl EncounterClassHistory {
    pub fn new(class_: impl Into<Coding>, period: impl Into<Period>) -> Self {
        Self {
            class_: class_.into(),
            period: period.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(EncounterClassHistory, "Encounter.classHistory");
crate::impl_backbone_element!(EncounterClassHistory);

crate::model_builder! {
    pub struct EncounterClassHistoryBuilder => EncounterClassHistory {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_class(class_: Coding);
        req set_period(period: Period);
    }
}

impl EncounterClassHistoryBuilder {
    pub fn new(class_: impl Into<Coding>, period: impl Into<Period>) -> Self {
        Self::from(EncounterClassHistory::new(class_, period))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterParticipant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Role of participant in encounter
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    /// Persons involved in the encounter other than the patient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<Reference>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(EncounterParticipant, "Encounter.participant");
crate::impl_backbone_element!(EncounterParticipant);

crate::model_builder! {
    pub struct EncounterParticipantBuilder => EncounterParticipant {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        add add_type(type_: CodeableConcept);
        set set_period(period: Period);
        set set_individual(individual: Reference);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterDiagnosis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// The diagnosis or procedure relevant to the encounter
    pub condition: Reference,

    /// Role that this diagnosis has within the encounter
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub use_: Option<CodeableConcept>,

    /// Ranking of the diagnosis (for each role type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(rename = "_rank", skip_serializing_if = "Option::is_none")]
    pub rank_ext: Option<Element>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl EncounterDiagnosis {
    pub fn new(condition: impl Into<Reference>) -> Self {
        Self {
            condition: condition.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(EncounterDiagnosis, "Encounter.diagnosis");
crate::impl_backbone_element!(EncounterDiagnosis);

crate::model_builder! {
    pub struct EncounterDiagnosisBuilder => EncounterDiagnosis {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_condition(condition: Reference);
        set set_use(use_: CodeableConcept);
        set set_rank(rank: u32);
    }
}

impl EncounterDiagnosisBuilder {
    pub fn new(condition: impl Into<Reference>) -> Self {
        Self::from(EncounterDiagnosis::new(condition))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterHospitalization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_admission_identifier: Option<Identifier>,

    /// The location/organization from which the patient came before admission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admit_source: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub re_admission: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_preference: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_courtesy: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_arrangement: Option<Vec<CodeableConcept>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Reference>,

    /// Category or kind of location after discharge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge_disposition: Option<CodeableConcept>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(EncounterHospitalization, "Encounter.hospitalization");
crate::impl_backbone_element!(EncounterHospitalization);

crate::model_builder! {
    pub struct EncounterHospitalizationBuilder => EncounterHospitalization {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        set set_pre_admission_identifier(pre_admission_identifier: Identifier);
        set set_origin(origin: Reference);
        set set_admit_source(admit_source: CodeableConcept);
        set set_re_admission(re_admission: CodeableConcept);
        add add_diet_preference(diet_preference: CodeableConcept);
        add add_special_courtesy(special_courtesy: CodeableConcept);
        add add_special_arrangement(special_arrangement: CodeableConcept);
        set set_destination(destination: Reference);
        set set_discharge_disposition(discharge_disposition: CodeableConcept);
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// Location the encounter takes place
    pub location: Reference,

    /// planned | active | reserved | completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EncounterLocationStatus>,

    #[serde(rename = "_status", skip_serializing_if = "Option::is_none")]
    pub status_ext: Option<Element>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<CodeableConcept>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl EncounterLocation {
    pub fn new(location: impl Into<Reference>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(EncounterLocation, "Encounter.location");
crate::impl_backbone_element!(EncounterLocation);

crate::model_builder! {
    pub struct EncounterLocationBuilder => EncounterLocation {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_location(location: Reference);
        set set_status(status: EncounterLocationStatus);
        set set_physical_type(physical_type: CodeableConcept);
        set set_period(period: Period);
    }
}

impl EncounterLocationBuilder {
    pub fn new(location: impl Into<Reference>) -> Self {
        Self::from(EncounterLocation::new(location))
    }
}

impl Encounter {
    /// Records the current status in `statusHistory` and moves to `status`
    pub fn transition(&mut self, status: EncounterStatus, period: Period) {
        self.status_history
            .get_or_insert_with(Vec::new)
            .push(EncounterStatusHistory::new(self.status, period));
        self.status = status;
    }
}
