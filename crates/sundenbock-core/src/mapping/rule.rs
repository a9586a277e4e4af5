//! The per-field rule language.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::error::MappingError;
use super::spec::{MappedRecord, MappingSpec, RuleSet};

/// Converter for a single field.
///
/// Receives the source value (`None` when the source field is absent) and
/// returns the target value (`None` leaves the target field absent).
pub type ScalarFn =
    Arc<dyn Fn(Option<&Value>) -> Result<Option<Value>, MappingError> + Send + Sync>;

/// Converter applied to each element of a sequence.
pub type ElementFn = Arc<dyn Fn(&Value) -> Result<Value, MappingError> + Send + Sync>;

/// How the elements of an `array` rule are mapped.
#[derive(Clone)]
pub enum ElementMap {
    /// Apply a converter to every element.
    Func(ElementFn),
    /// Apply a nested spec to every element.
    Spec(Arc<RuleSet>),
    /// Apply the spec that owns this rule (self-similar trees such as comment threads).
    Recursive,
}

/// A rule describing how one target field is produced.
#[derive(Clone)]
pub enum FieldRule {
    /// Copy the value unchanged. `from` defaults to the target field name.
    Keep { from: Option<String> },
    /// Copy the value unchanged from a differently named source field.
    Rename { from: String },
    /// Leave the field out of the output.
    Omit,
    /// Copy the value through a converter.
    MapScalar { from: Option<String>, map: ScalarFn },
    /// Map a sequence elementwise. Absent or non-sequence sources give `[]`.
    MapArray { from: Option<String>, map: ElementMap },
    /// Apply a nested spec to a record. Absent sources stay absent.
    MapNested { from: Option<String>, spec: Arc<RuleSet> },
}

impl FieldRule {
    pub fn keep() -> Self {
        Self::Keep { from: None }
    }

    pub fn rename(from: impl Into<String>) -> Self {
        Self::Rename { from: from.into() }
    }

    pub fn omit() -> Self {
        Self::Omit
    }

    pub fn map<F>(map: F) -> Self
    where
        F: Fn(Option<&Value>) -> Result<Option<Value>, MappingError> + Send + Sync + 'static,
    {
        Self::MapScalar {
            from: None,
            map: Arc::new(map),
        }
    }

    pub fn array<F>(map: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, MappingError> + Send + Sync + 'static,
    {
        Self::MapArray {
            from: None,
            map: ElementMap::Func(Arc::new(map)),
        }
    }

    /// Maps every element of a sequence with another spec.
    pub fn nested_array<U: MappedRecord>(spec: &MappingSpec<U>) -> Self {
        Self::MapArray {
            from: None,
            map: ElementMap::Spec(spec.rule_set().clone()),
        }
    }

    /// Maps every element of a sequence with the spec this rule belongs to.
    pub fn recursive_array() -> Self {
        Self::MapArray {
            from: None,
            map: ElementMap::Recursive,
        }
    }

    pub fn nested<U: MappedRecord>(spec: &MappingSpec<U>) -> Self {
        Self::MapNested {
            from: None,
            spec: spec.rule_set().clone(),
        }
    }

    /// Sets the source key.
    ///
    /// `Omit` has no source and is returned unchanged.
    pub fn from(self, key: impl Into<String>) -> Self {
        let key = key.into();
        match self {
            Self::Keep { .. } => Self::Keep { from: Some(key) },
            Self::Rename { .. } => Self::Rename { from: key },
            Self::Omit => Self::Omit,
            Self::MapScalar { map, .. } => Self::MapScalar {
                from: Some(key),
                map,
            },
            Self::MapArray { map, .. } => Self::MapArray {
                from: Some(key),
                map,
            },
            Self::MapNested { spec, .. } => Self::MapNested {
                from: Some(key),
                spec,
            },
        }
    }

    /// Returns the rule's kind as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Keep { .. } => "keep",
            Self::Rename { .. } => "rename",
            Self::Omit => "omit",
            Self::MapScalar { .. } => "map",
            Self::MapArray { .. } => "array",
            Self::MapNested { .. } => "nested",
        }
    }

    /// Resolves the source key for `field`, or `None` for `Omit`.
    pub fn source_key<'a>(&'a self, field: &'a str) -> Option<&'a str> {
        match self {
            Self::Omit => None,
            Self::Rename { from } => Some(from.as_str()),
            Self::Keep { from }
            | Self::MapScalar { from, .. }
            | Self::MapArray { from, .. }
            | Self::MapNested { from, .. } => Some(from.as_deref().unwrap_or(field)),
        }
    }
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = match self {
            Self::Omit => None,
            Self::Rename { from } => Some(from.as_str()),
            Self::Keep { from }
            | Self::MapScalar { from, .. }
            | Self::MapArray { from, .. }
            | Self::MapNested { from, .. } => from.as_deref(),
        };
        f.debug_struct("FieldRule")
            .field("kind", &self.kind())
            .field("from", &from)
            .finish()
    }
}

impl fmt::Debug for ElementMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Func(_) => f.write_str("Func"),
            Self::Spec(rules) => write!(f, "Spec({})", rules.target()),
            Self::Recursive => f.write_str("Recursive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_key_defaults_to_field_name() {
        assert_eq!(FieldRule::keep().source_key("title"), Some("title"));
        assert_eq!(
            FieldRule::keep().from("name").source_key("title"),
            Some("name")
        );
        assert_eq!(FieldRule::rename("name").source_key("title"), Some("name"));
        assert_eq!(FieldRule::omit().source_key("title"), None);
    }

    #[test]
    fn test_from_keeps_converter() {
        let rule = FieldRule::map(|v| Ok(v.cloned())).from("createdDate");
        assert_eq!(rule.kind(), "map");
        assert_eq!(rule.source_key("createdAt"), Some("createdDate"));
    }

    #[test]
    fn test_omit_ignores_from() {
        let rule = FieldRule::omit().from("password");
        assert_eq!(rule.kind(), "omit");
        assert_eq!(rule.source_key("password"), None);
    }
}
