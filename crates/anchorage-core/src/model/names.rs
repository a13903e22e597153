use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Splits `projects/{p}/locations/{l}/{collection}/{id}` into its parts.
fn split_resource_name<'a>(name: &'a str, collection: &str) -> Option<(&'a str, &'a str, &'a str)> {
    let mut parts = name.split('/');
    let (Some("projects"), Some(project), Some("locations"), Some(location), Some(coll), Some(id), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return None;
    };

    if coll != collection || project.is_empty() || location.is_empty() || id.is_empty() {
        return None;
    }

    Some((project, location, id))
}

macro_rules! define_name {
    ($name:ident, $collection:expr, $kind:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Collection segment used in the resource path.
            pub const COLLECTION: &'static str = $collection;

            /// Parse a fully qualified resource name.
            pub fn parse(name: impl Into<String>) -> Result<Self> {
                let name = name.into();
                if split_resource_name(&name, Self::COLLECTION).is_none() {
                    return Err(Error::InvalidResourceName { kind: $kind, name });
                }
                Ok(Self(name))
            }

            /// Build a resource name from its components.
            pub fn from_parts(project: &str, location: &str, id: &str) -> Result<Self> {
                Self::parse(format!(
                    "projects/{project}/locations/{location}/{}/{id}",
                    Self::COLLECTION
                ))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn project(&self) -> &str {
                self.parts().0
            }

            #[must_use]
            pub fn location(&self) -> &str {
                self.parts().1
            }

            /// The trailing numeric (or user-chosen) id.
            #[must_use]
            pub fn id(&self) -> &str {
                self.parts().2
            }

            fn parts(&self) -> (&str, &str, &str) {
                // Validated in `parse`, the only constructor.
                split_resource_name(&self.0, Self::COLLECTION).unwrap_or(("", "", ""))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name!(
    IndexName,
    "indexes",
    "index",
    "Fully qualified name of a vector index."
);
define_name!(
    IndexEndpointName,
    "indexEndpoints",
    "index endpoint",
    "Fully qualified name of an index endpoint."
);

/// Name of a long-running operation, e.g.
/// `projects/p/locations/l/indexes/1/operations/2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OperationName(String);

impl OperationName {
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let valid = name.starts_with("projects/")
            && name
                .rsplit_once("/operations/")
                .is_some_and(|(_, id)| !id.is_empty() && !id.contains('/'));
        if !valid {
            return Err(Error::InvalidResourceName {
                kind: "operation",
                name,
            });
        }
        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for OperationName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<OperationName> for String {
    fn from(value: OperationName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_parts() {
        let name = IndexName::parse("projects/my-proj/locations/us-central1/indexes/123").unwrap();
        assert_eq!(name.project(), "my-proj");
        assert_eq!(name.location(), "us-central1");
        assert_eq!(name.id(), "123");
    }

    #[test]
    fn test_index_name_from_parts() {
        let name = IndexEndpointName::from_parts("p", "europe-west4", "42").unwrap();
        assert_eq!(
            name.as_str(),
            "projects/p/locations/europe-west4/indexEndpoints/42"
        );
    }

    #[test]
    fn test_wrong_collection_rejected() {
        let result = IndexName::parse("projects/p/locations/l/indexEndpoints/1");
        assert!(matches!(
            result,
            Err(Error::InvalidResourceName { kind: "index", .. })
        ));
    }

    #[test]
    fn test_trailing_segments_rejected() {
        assert!(IndexName::parse("projects/p/locations/l/indexes/1/operations/2").is_err());
        assert!(IndexName::parse("projects//locations/l/indexes/1").is_err());
        assert!(IndexName::parse("indexes/1").is_err());
    }

    #[test]
    fn test_names_deserialize_from_json_strings() {
        let name: IndexEndpointName =
            serde_json::from_str(r#""projects/p/locations/l/indexEndpoints/9""#).unwrap();
        assert_eq!(name.id(), "9");

        let bad: std::result::Result<IndexEndpointName, _> = serde_json::from_str(r#""nope""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_operation_name() {
        let op = OperationName::parse("projects/p/locations/l/indexes/1/operations/77").unwrap();
        assert_eq!(op.to_string(), "projects/p/locations/l/indexes/1/operations/77");

        assert!(OperationName::parse("projects/p/locations/l/indexes/1").is_err());
        assert!(OperationName::parse("projects/p/operations/").is_err());
    }
}
