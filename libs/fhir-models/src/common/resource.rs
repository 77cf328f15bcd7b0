//! Per-release resource unions
//!
//! Each release module declares a `Resource` enum with [`resource_union!`].
//! The enum dispatches on `resourceType` and keeps resource types the module
//! does not model as raw JSON in its `Other` variant, so contained resources
//! and bundle entries of any type survive a round trip.

use serde_json::Value;

use super::error::{Error, Result};
use super::model::FhirModel;
use super::version::FhirVersion;

/// A release's union of resource models
pub trait ResourceUnion: FhirModel {
    /// The release this union belongs to
    const RELEASE: FhirVersion;

    /// Resource types with a typed variant
    const MODELED: &'static [&'static str];

    /// Parse by `resourceType`, falling back to the raw variant
    fn from_value(value: Value) -> Result<Self>;

    fn into_value(self) -> Result<Value>;

    /// The `resourceType` of the held resource
    fn resource_type(&self) -> &str;

    fn id(&self) -> Option<&str>;

    /// `false` for resources held as raw JSON
    fn is_modeled(&self) -> bool;

    fn is_modeled_type(resource_type: &str) -> bool {
        Self::MODELED.contains(&resource_type)
    }
}

/// Reads `resourceType` from a JSON resource
pub fn resource_type_of(value: &Value) -> Result<&str> {
    let object = value.as_object().ok_or(Error::ExpectedObject("resource"))?;
    match object.get("resourceType") {
        Some(Value::String(resource_type)) => Ok(resource_type),
        Some(other) => Err(Error::InvalidFieldValue(format!(
            "resourceType must be a string, got {}",
            other
        ))),
        None => Err(Error::MissingField("resourceType".to_string())),
    }
}

#[doc(hidden)]
pub fn keep_unmodeled(release: FhirVersion, value: Value) -> Value {
    let resource_type = value
        .get("resourceType")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    tracing::debug!(
        %release,
        resource_type,
        "no typed model for resource, keeping raw JSON"
    );
    value
}

/// Declares a release's `Resource` enum.
///
/// Every variant boxes a model implementing `ResourceBase`. An `Other(Value)`
/// variant is added for the remaining resource types.
#[macro_export]
macro_rules! resource_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $release:ident {
            $( $variant:ident($ty:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $variant(::std::boxed::Box<$ty>), )+
            /// A resource type without a typed model in this release module
            Other($crate::__private::serde_json::Value),
        }

        impl $crate::resource::ResourceUnion for $name {
            const RELEASE: $crate::version::FhirVersion = $crate::version::FhirVersion::$release;
            const MODELED: &'static [&'static str] =
                &[$( <$ty as $crate::model::ResourceBase>::RESOURCE_TYPE ),+];

            fn from_value(value: $crate::__private::serde_json::Value) -> $crate::Result<Self> {
                let resource_type = $crate::resource::resource_type_of(&value)?.to_string();
                $(
                    if resource_type == <$ty as $crate::model::ResourceBase>::RESOURCE_TYPE {
                        let model: $ty = $crate::__private::serde_json::from_value(value)?;
                        return ::std::result::Result::Ok($name::$variant(::std::boxed::Box::new(model)));
                    }
                )+
                ::std::result::Result::Ok($name::Other($crate::resource::keep_unmodeled(
                    <Self as $crate::resource::ResourceUnion>::RELEASE,
                    value,
                )))
            }

            fn into_value(self) -> $crate::Result<$crate::__private::serde_json::Value> {
                match self {
                    $( $name::$variant(resource) => {
                        ::std::result::Result::Ok($crate::__private::serde_json::to_value(*resource)?)
                    } )+
                    $name::Other(value) => ::std::result::Result::Ok(value),
                }
            }

            fn resource_type(&self) -> &str {
                match self {
                    $( $name::$variant(_) => <$ty as $crate::model::ResourceBase>::RESOURCE_TYPE, )+
                    $name::Other(value) => value
                        .get("resourceType")
                        .and_then($crate::__private::serde_json::Value::as_str)
                        .unwrap_or_default(),
                }
            }

            fn id(&self) -> ::std::option::Option<&str> {
                match self {
                    $( $name::$variant(resource) => $crate::model::ResourceBase::id(resource.as_ref()), )+
                    $name::Other(value) => value
                        .get("id")
                        .and_then($crate::__private::serde_json::Value::as_str),
                }
            }

            fn is_modeled(&self) -> bool {
                !matches!(self, $name::Other(_))
            }
        }

        $(
            impl ::std::convert::From<$ty> for $name {
                fn from(resource: $ty) -> Self {
                    $name::$variant(::std::boxed::Box::new(resource))
                }
            }
        )+

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                match self {
                    $( $name::$variant(resource) => {
                        $crate::__private::serde::Serialize::serialize(resource, serializer)
                    } )+
                    $name::Other(value) => $crate::__private::serde::Serialize::serialize(value, serializer),
                }
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <$crate::__private::serde_json::Value as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::resource::ResourceUnion>::from_value(value)
                    .map_err($crate::Error::into_de_error)
            }
        }

        $crate::fhir_model!($name, "Resource");
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_type_of() {
        let value = json!({"resourceType": "Patient", "id": "p1"});
        assert_eq!(resource_type_of(&value).unwrap(), "Patient");
    }

    #[test]
    fn test_resource_type_of_rejects_bad_input() {
        assert!(matches!(
            resource_type_of(&json!({"id": "p1"})),
            Err(Error::MissingField(_))
        ));
        assert!(matches!(
            resource_type_of(&json!({"resourceType": 42})),
            Err(Error::InvalidFieldValue(_))
        ));
        assert!(matches!(
            resource_type_of(&json!([1, 2])),
            Err(Error::ExpectedObject(_))
        ));
    }
}
