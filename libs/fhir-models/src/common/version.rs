//! FHIR release identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::Error;

/// FHIR release a model module targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FhirVersion {
    R4,
    R4B,
    #[default]
    R5,
}

impl FhirVersion {
    /// Published version number of the release (`fhirVersion` in conformance resources)
    pub fn release_number(&self) -> &'static str {
        match self {
            FhirVersion::R4 => "4.0.1",
            FhirVersion::R4B => "4.3.0",
            FhirVersion::R5 => "5.0.0",
        }
    }

    /// Resolve a release from a `fhirVersion` value such as `4.0.1` or `5.0.0-ballot`
    pub fn from_release_number(number: &str) -> Option<Self> {
        let mut parts = number.split(|c: char| c == '.' || c == '-');
        match (parts.next(), parts.next()) {
            (Some("4"), Some("0")) => Some(FhirVersion::R4),
            (Some("4"), Some("3")) => Some(FhirVersion::R4B),
            (Some("5"), _) => Some(FhirVersion::R5),
            _ => None,
        }
    }
}

impl fmt::Display for FhirVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FhirVersion::R4 => "R4",
            FhirVersion::R4B => "R4B",
            FhirVersion::R5 => "R5",
        };
        f.write_str(label)
    }
}

impl FromStr for FhirVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "R4" => Ok(FhirVersion::R4),
            "R4B" => Ok(FhirVersion::R4B),
            "R5" => Ok(FhirVersion::R5),
            _ => FhirVersion::from_release_number(s).ok_or_else(|| {
                Error::InvalidFieldValue(format!("unsupported FHIR version '{}'", s))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_and_numbers() {
        assert_eq!("r4".parse::<FhirVersion>().unwrap(), FhirVersion::R4);
        assert_eq!("R4B".parse::<FhirVersion>().unwrap(), FhirVersion::R4B);
        assert_eq!("4.0.1".parse::<FhirVersion>().unwrap(), FhirVersion::R4);
        assert_eq!("4.3.0".parse::<FhirVersion>().unwrap(), FhirVersion::R4B);
        assert_eq!("5.0.0".parse::<FhirVersion>().unwrap(), FhirVersion::R5);
        assert!("3.0.2".parse::<FhirVersion>().is_err());
    }

    #[test]
    fn test_release_number() {
        assert_eq!(FhirVersion::R4.release_number(), "4.0.1");
        assert_eq!(FhirVersion::R5.to_string(), "R5");
    }
}
