//! Field kind tags.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind tag of a field.
///
/// `subresource` fields hold a consumable integer quantity. Any other
/// non-empty tag is accepted and carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A plain value.
    Value,
    /// A boolean flag.
    Boolean,
    /// A consumable integer quantity.
    Subresource,
    /// Any other tag.
    Custom(String),
}

impl FieldKind {
    /// The wire tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value => "value",
            Self::Boolean => "boolean",
            Self::Subresource => "subresource",
            Self::Custom(tag) => tag,
        }
    }

    /// Whether this is the consumable quantity kind.
    pub fn is_subresource(&self) -> bool {
        matches!(self, Self::Subresource)
    }

    /// Whether the tag is blank.
    pub fn is_empty(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl From<&str> for FieldKind {
    fn from(tag: &str) -> Self {
        match tag {
            "value" => Self::Value,
            "boolean" => Self::Boolean,
            "subresource" => Self::Subresource,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(Self::from(tag.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_custom_tags() {
        assert_eq!(FieldKind::from("subresource"), FieldKind::Subresource);
        assert_eq!(FieldKind::from("color"), FieldKind::Custom("color".into()));
        assert!(FieldKind::from("").is_empty());
        assert_eq!(
            serde_json::to_string(&FieldKind::Custom("color".into())).unwrap(),
            "\"color\""
        );
    }
}
