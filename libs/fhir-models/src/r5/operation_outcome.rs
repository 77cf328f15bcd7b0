//! OperationOutcome (R5)
//!
//! Same members as R4 with `contained` typed by the R5 union. Converts to and
//! from the validator's [`ValidationFailure`] like its R4 counterpart.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::prelude::*;

pub use crate::r4::{OperationOutcomeIssue, OperationOutcomeIssueBuilder};

/// Information about the success/failure of an action
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcome {
    #[serde(default)]
    pub resource_type: ResourceTag<OperationOutcome>,

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

    /// A single issue associated with the action
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue: Vec<OperationOutcomeIssue>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

crate::fhir_model!(OperationOutcome, "OperationOutcome");
crate::impl_domain_resource!(OperationOutcome, "OperationOutcome", contained = Resource);

crate::model_builder! {
    pub struct OperationOutcomeBuilder => OperationOutcome {
        set set_id(id: String);
        set set_meta(meta: Meta);
        set set_implicit_rules(implicit_rules: String);
        set set_language(language: String);
        set set_text(text: Narrative);
        add add_contained(contained: Resource);
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        push add_issue(issue: OperationOutcomeIssue);
    }
}

impl OperationOutcome {
    pub fn has_errors(&self) -> bool {
        self.issue.iter().any(|issue| issue.severity.is_blocking())
    }

    /// The issues as a validator rejection
    pub fn to_failure(&self) -> ValidationFailure {
        ValidationFailure::new(self.issue.iter().map(ValidationIssue::from).collect())
    }
}

impl From<&ValidationFailure> for OperationOutcome {
    fn from(failure: &ValidationFailure) -> Self {
        Self {
            issue: failure.issues.iter().map(OperationOutcomeIssue::from).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_conversion() {
        let failure = ValidationFailure::new(vec![
            ValidationIssue::error("required", "Patient.name: minimum required = 1").at("Patient.name"),
        ]);
        let outcome = OperationOutcome::from(&failure);

        assert!(outcome.has_errors());
        let json = outcome.to_json().unwrap();
        assert_eq!(json["issue"][0]["expression"][0], "Patient.name");
        assert_eq!(outcome.to_failure().issues.len(), 1);
    }

    #[test]
    fn test_contained_typed_by_r5_union() {
        let json = json!({
            "resourceType": "OperationOutcome",
            "contained": [{
                "resourceType": "MedicationRequest",
                "status": "active",
                "intent": "order",
                "medication": {"reference": {"reference": "Medication/m1"}},
                "subject": {"reference": "Patient/1"}
            }],
            "issue": [{"severity": "information", "code": "informational"}]
        });
        let outcome = OperationOutcome::from_json(&json).unwrap();
        assert!(matches!(outcome.contained.as_deref().unwrap()[0], Resource::MedicationRequest(_)));
        assert!(!outcome.has_errors());
        assert_eq!(outcome.to_json().unwrap(), json);
    }
}
