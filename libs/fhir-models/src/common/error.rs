//! Error types for FHIR models

use serde::{de, ser};
use thiserror::Error;

use super::validate::ValidationFailure;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid FHIR resource: {0}")]
    InvalidResource(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid field value: {0}")]
    InvalidFieldValue(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Expected resourceType '{expected}', found '{found}'")]
    ResourceTypeMismatch {
        expected: &'static str,
        found: String,
    },

    #[error("Unknown variant '{tag}' for choice element {field}")]
    UnknownChoiceTag { field: &'static str, tag: String },

    #[error("Choice element {field} has more than one variant present: {tags:?}")]
    ConflictingChoice {
        field: &'static str,
        tags: Vec<&'static str>,
    },

    #[error("Expected a JSON object for {0}")]
    ExpectedObject(&'static str),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationFailure),
}

impl Error {
    /// Message used when this error is re-raised through a serde error.
    ///
    /// A wrapped `serde_json::Error` gives its own message so that nested
    /// decodes do not stack `Serialization error:` prefixes.
    pub fn serde_message(&self) -> String {
        match self {
            Error::SerializationError(inner) => inner.to_string(),
            other => other.to_string(),
        }
    }

    pub fn into_de_error<E: de::Error>(self) -> E {
        E::custom(self.serde_message())
    }

    pub fn into_ser_error<E: ser::Error>(self) -> E {
        E::custom(self.serde_message())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_message_drops_nested_prefix() {
        let inner = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = Error::from(inner);
        assert!(err.to_string().starts_with("Serialization error: "));
        assert!(!err.serde_message().contains("Serialization error"));

        let err = Error::MissingField("status".to_string());
        assert_eq!(err.serde_message(), "Missing required field: status");
    }
}
