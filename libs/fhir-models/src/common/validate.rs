//! Validation seam
//!
//! Models never validate themselves. A validating build serializes the draft
//! and hands it to a [`ResourceValidator`] supplied by the caller, typically a
//! wrapper around a full FHIR validation engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Severity of a validation issue (OperationOutcome.issue.severity)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Fatal,
    #[default]
    Error,
    Warning,
    Information,
}

impl IssueSeverity {
    /// Fatal and error issues fail a validating build
    pub fn is_blocking(&self) -> bool {
        matches!(self, IssueSeverity::Fatal | IssueSeverity::Error)
    }
}

/// A single problem reported by a validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    /// OperationOutcome issue type code (e.g. `required`, `value`, `invariant`)
    pub code: String,
    /// FHIRPath expression locating the problem, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            code: code.into(),
            path: None,
            message: message.into(),
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            code: code.into(),
            path: None,
            message: message.into(),
        }
    }

    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{:?}] {}: {}", self.severity, path, self.message),
            None => write!(f, "[{:?}] {}", self.severity, self.message),
        }
    }
}

/// Rejection returned by a [`ResourceValidator`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity.is_blocking())
            .count()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} issue(s)", self.issues.len())?;
        if let Some(first) = self.issues.first() {
            write!(f, ", first: {}", first)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// External validator consulted by validating builds
#[async_trait]
pub trait ResourceValidator: Send + Sync {
    /// Validate the JSON form of a model of type `type_name`
    async fn validate(&self, type_name: &str, json: &Value) -> Result<(), ValidationFailure>;
}

/// Accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopValidator;

#[async_trait]
impl ResourceValidator for NoopValidator {
    async fn validate(&self, _type_name: &str, _json: &Value) -> Result<(), ValidationFailure> {
        Ok(())
    }
}

/// Adapts a synchronous closure into a [`ResourceValidator`]
pub struct FnValidator<F>(pub F);

#[async_trait]
impl<F> ResourceValidator for FnValidator<F>
where
    F: Fn(&str, &Value) -> Result<(), ValidationFailure> + Send + Sync,
{
    async fn validate(&self, type_name: &str, json: &Value) -> Result<(), ValidationFailure> {
        (self.0)(type_name, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_count_ignores_warnings() {
        let failure = ValidationFailure::new(vec![
            ValidationIssue::error("required", "Observation.status is required"),
            ValidationIssue::warning("informational", "no narrative"),
        ]);
        assert_eq!(failure.error_count(), 1);
        assert!(failure.to_string().starts_with("2 issue(s)"));
    }

    #[tokio::test]
    async fn test_fn_validator_delegates() {
        let validator = FnValidator(|type_name: &str, json: &Value| {
            if json.get("status").is_some() {
                Ok(())
            } else {
                Err(ValidationFailure::single(
                    ValidationIssue::error("required", "status missing")
                        .at(format!("{}.status", type_name)),
                ))
            }
        });

        assert!(validator
            .validate("Observation", &json!({"status": "final"}))
            .await
            .is_ok());

        let err = validator
            .validate("Observation", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.issues[0].path.as_deref(), Some("Observation.status"));
    }

    #[tokio::test]
    async fn test_noop_validator_accepts() {
        assert!(NoopValidator.validate("Patient", &json!({})).await.is_ok());
    }
}
