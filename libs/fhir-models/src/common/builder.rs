//! Fluent builders
//!
//! Every model has a builder owning a draft copy of the model. Setters consume
//! and return the builder so calls chain:
//!
//! ```rust
//! use fhirbind_models::prelude::*;
//!
//! let coding = CodingBuilder::default()
//!     .set_system("http://loinc.org")
//!     .set_code("8867-4")
//!     .set_display("Heart rate")
//!     .build();
//! assert_eq!(coding.code.as_deref(), Some("8867-4"));
//! ```

use async_trait::async_trait;

use super::error::{Error, Result};
use super::model::FhirModel;
use super::validate::ResourceValidator;

/// Behavior shared by all builders
#[async_trait]
pub trait ModelBuilder: Sized + Send {
    type Model: FhirModel + Send;

    fn draft(&self) -> &Self::Model;
    fn draft_mut(&mut self) -> &mut Self::Model;

    /// Finish without validation
    fn build(self) -> Self::Model;

    /// Edit the draft directly, for fields without a dedicated setter
    fn update<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Self::Model),
    {
        f(self.draft_mut());
        self
    }

    /// Finish, then hand the JSON form to `validator`.
    ///
    /// The model is returned only if the validator accepts it.
    async fn build_validated<V>(self, validator: &V) -> Result<Self::Model>
    where
        V: ResourceValidator + ?Sized,
    {
        let model = self.build();
        let json = model.to_json()?;
        let type_name = <Self::Model as FhirModel>::TYPE_NAME;

        tracing::debug!(type_name, "validating built model");
        match validator.validate(type_name, &json).await {
            Ok(()) => Ok(model),
            Err(failure) => {
                tracing::debug!(
                    type_name,
                    issues = failure.issues.len(),
                    errors = failure.error_count(),
                    "validator rejected model"
                );
                Err(Error::Validation(failure))
            }
        }
    }
}

/// Declares a builder struct and its setters.
///
/// Each line names a setter kind, the method and the target field:
///
/// - `set`: assigns `Some(value)` to an optional field
/// - `req`: assigns a required (non-optional) field
/// - `add`: appends to an optional repeating field
/// - `push`: appends to a required repeating field
///
/// Setters take `impl Into<T>`.
#[macro_export]
macro_rules! model_builder {
    (
        $(#[$meta:meta])*
        $vis:vis struct $builder:ident => $model:ty {
            $( $kind:ident $method:ident($field:ident: $ty:ty); )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        $vis struct $builder {
            draft: $model,
        }

        impl $crate::builder::ModelBuilder for $builder {
            type Model = $model;

            fn draft(&self) -> &$model {
                &self.draft
            }

            fn draft_mut(&mut self) -> &mut $model {
                &mut self.draft
            }

            fn build(self) -> $model {
                self.draft
            }
        }

        impl ::std::convert::From<$model> for $builder {
            fn from(draft: $model) -> Self {
                Self { draft }
            }
        }

        impl $builder {
            $( $crate::model_builder!(@setter $kind $method $field $ty); )*
        }
    };

    (@setter set $method:ident $field:ident $ty:ty) => {
        pub fn $method(mut self, value: impl ::std::convert::Into<$ty>) -> Self {
            self.draft.$field = ::std::option::Option::Some(value.into());
            self
        }
    };
    (@setter req $method:ident $field:ident $ty:ty) => {
        pub fn $method(mut self, value: impl ::std::convert::Into<$ty>) -> Self {
            self.draft.$field = value.into();
            self
        }
    };
    (@setter add $method:ident $field:ident $ty:ty) => {
        pub fn $method(mut self, value: impl ::std::convert::Into<$ty>) -> Self {
            self.draft
                .$field
                .get_or_insert_with(::std::vec::Vec::new)
                .push(value.into());
            self
        }
    };
    (@setter push $method:ident $field:ident $ty:ty) => {
        pub fn $method(mut self, value: impl ::std::convert::Into<$ty>) -> Self {
            self.draft.$field.push(value.into());
            self
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::datatypes::{Coding, CodingBuilder, Identifier, IdentifierBuilder};
    use crate::common::validate::{FnValidator, NoopValidator, ValidationFailure, ValidationIssue};
    use serde_json::Value;

    #[test]
    fn test_setters_chain() {
        let identifier = IdentifierBuilder::default()
            .set_system("http://hospital.example.org/mrn")
            .set_value("MRN-001")
            .build();

        assert_eq!(identifier.value.as_deref(), Some("MRN-001"));
        assert!(identifier.type_.is_none());
    }

    #[test]
    fn test_update_and_from_model() {
        let coding = Coding::new("http://loinc.org", "8867-4");
        let changed = CodingBuilder::from(coding.clone())
            .update(|c| c.version = Some("2.74".into()))
            .build();

        assert_eq!(changed.version.as_deref(), Some("2.74"));
        assert_eq!(changed.code, coding.code);
    }

    #[tokio::test]
    async fn test_build_validated_accepts() {
        let identifier = IdentifierBuilder::default()
            .set_value("A-1")
            .build_validated(&NoopValidator)
            .await
            .unwrap();
        assert_eq!(identifier.value.as_deref(), Some("A-1"));
    }

    #[tokio::test]
    async fn test_build_validated_propagates_failure() {
        let validator = FnValidator(|type_name: &str, json: &Value| {
            if json.get("system").is_none() {
                return Err(ValidationFailure::single(
                    ValidationIssue::error("required", "system is required")
                        .at(format!("{}.system", type_name)),
                ));
            }
            Ok(())
        });

        let err = IdentifierBuilder::default()
            .set_value("A-1")
            .build_validated(&validator)
            .await
            .unwrap_err();

        match err {
            Error::Validation(failure) => {
                assert_eq!(failure.issues[0].path.as_deref(), Some("Identifier.system"));
            }
            other => panic!("unexpected error {:?}", other),
        }

        let ok: Identifier = IdentifierBuilder::default()
            .set_system("urn:ietf:rfc:3986")
            .build_validated(&validator)
            .await
            .unwrap();
        assert!(ok.system.is_some());
    }
}
