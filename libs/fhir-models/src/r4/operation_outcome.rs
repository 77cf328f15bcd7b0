//! OperationOutcome (R4)
//!
//! Convertible to and from the validator's [`ValidationFailure`]. The issue
//! backbone is reused by the R5 model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Resource;
use crate::common::validate::IssueSeverity;
use crate::prelude::*;

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

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOutcomeIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<Vec<Extension>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_extension: Option<Vec<Extension>>,

    /// fatal | error | warning | information
    pub severity: IssueSeverity,

    #[serde(rename = "_severity", skip_serializing_if = "Option::is_none")]
    pub severity_ext: Option<Element>,

    /// Error or warning code
    pub code: String,

    #[serde(rename = "_code", skip_serializing_if = "Option::is_none")]
    pub code_ext: Option<Element>,

    /// Additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<CodeableConcept>,

    /// Additional diagnostic information about the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,

    #[serde(rename = "_diagnostics", skip_serializing_if = "Option::is_none")]
    pub diagnostics_ext: Option<Element>,

    /// Deprecated: Path of element(s) related to issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<String>>,

    #[serde(rename = "_location", skip_serializing_if = "Option::is_none")]
    pub location_ext: Option<Vec<Option<Element>>>,

    /// FHIRPath of element(s) related to issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<Vec<String>>,

    #[serde(rename = "_expression", skip_serializing_if = "Option::is_none")]
    pub expression_ext: Option<Vec<Option<Element>>>,

    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

impl OperationOutcomeIssue {
    pub fn new(severity: IssueSeverity, code: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            ..Default::default()
        }
    }
}

crate::fhir_model!(OperationOutcomeIssue, "OperationOutcome.issue");
crate::impl_backbone_element!(OperationOutcomeIssue);

crate::model_builder! {
    pub struct OperationOutcomeIssueBuilder => OperationOutcomeIssue {
        add add_extension(extension: Extension);
        add add_modifier_extension(modifier_extension: Extension);
        req set_severity(severity: IssueSeverity);
        req set_code(code: String);
        set set_details(details: CodeableConcept);
        set set_diagnostics(diagnostics: String);
        add add_location(location: String);
        add add_expression(expression: String);
    }
}

impl OperationOutcomeIssueBuilder {
    pub fn new(severity: IssueSeverity, code: impl Into<String>) -> Self {
        Self::from(OperationOutcomeIssue::new(severity, code))
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

impl From<&ValidationIssue> for OperationOutcomeIssue {
    fn from(issue: &ValidationIssue) -> Self {
        Self {
            severity: issue.severity,
            code: issue.code.clone(),
            diagnostics: Some(issue.message.clone()),
            expression: issue.path.clone().map(|path| vec![path]),
            ..Default::default()
        }
    }
}

impl From<&OperationOutcomeIssue> for ValidationIssue {
    fn from(issue: &OperationOutcomeIssue) -> Self {
        let message = issue
            .diagnostics
            .clone()
            .or_else(|| issue.details.as_ref().and_then(|d| d.text.clone()))
            .unwrap_or_default();
        let path = issue
            .expression
            .iter()
            .chain(issue.location.iter())
            .flatten()
            .next()
            .cloned();
        ValidationIssue {
            severity: issue.severity,
            code: issue.code.clone(),
            path,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_roundtrip() {
        let json = json!({
            "resourceType": "OperationOutcome",
            "id": "validationfail",
            "issue": [{
                "severity": "error",
                "code": "structure",
                "details": {"text": "Error parsing resource XML (Unknown Content \"label\""},
                "expression": ["Patient.identifier"]
            }]
        });
        let outcome = OperationOutcome::from_json(&json).unwrap();

        assert!(outcome.has_errors());
        assert_eq!(outcome.to_json().unwrap(), json);
    }

    #[test]
    fn test_failure_conversions() {
        let failure = ValidationFailure::new(vec![
            ValidationIssue::error("required", "Patient.name: minimum required = 1").at("Patient.name"),
            ValidationIssue::warning("informational", "no narrative"),
        ]);
        let outcome = OperationOutcome::from(&failure);

        assert_eq!(outcome.issue.len(), 2);
        assert_eq!(outcome.issue[0].expression, Some(vec!["Patient.name".to_string()]));
        assert!(outcome.has_errors());

        let json = outcome.to_json().unwrap();
        assert_eq!(json["issue"][1]["severity"], "warning");
        assert_eq!(outcome.to_failure(), failure);
    }

    #[test]
    fn test_message_falls_back_to_details() {
        let issue = OperationOutcomeIssueBuilder::new(IssueSeverity::Information, "informational")
            .set_details(CodeableConcept::from_text("all ok"))
            .add_location("/f:Patient")
            .build();
        let converted = ValidationIssue::from(&issue);

        assert_eq!(converted.message, "all ok");
        assert_eq!(converted.path.as_deref(), Some("/f:Patient"));
        assert!(!OperationOutcomeBuilder::default().add_issue(issue).build().has_errors());
    }
}
