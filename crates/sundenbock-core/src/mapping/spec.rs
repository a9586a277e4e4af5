//! Spec construction and validation.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::error::MappingError;
use super::rule::FieldRule;

/// A record type that can be the target of a mapping spec.
///
/// `FIELDS` lists the serialized names of every field, in declaration order.
/// It is the contract a spec is validated against.
pub trait MappedRecord: DeserializeOwned {
    /// Name used in diagnostics.
    const TYPE_NAME: &'static str;
    /// Serialized field names of the record.
    const FIELDS: &'static [&'static str];
}

/// Validated, type-erased rules for one target type, in target field order.
#[derive(Debug)]
pub struct RuleSet {
    target: &'static str,
    rules: Vec<(&'static str, FieldRule)>,
}

impl RuleSet {
    /// Name of the target type.
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// Iterates `(field, rule)` pairs in target field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldRule)> {
        self.rules.iter().map(|(field, rule)| (*field, rule))
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the target has no fields.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// An immutable mapping spec producing records of type `T`.
///
/// Cloning is cheap; clones share the same rules.
pub struct MappingSpec<T> {
    rules: Arc<RuleSet>,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for MappingSpec<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for MappingSpec<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappingSpec")
            .field("rules", &self.rules)
            .finish()
    }
}

impl<T: MappedRecord> MappingSpec<T> {
    /// Starts a spec builder for `T`.
    pub fn builder() -> SpecBuilder<T> {
        SpecBuilder {
            rules: Vec::new(),
            _target: PhantomData,
        }
    }

    /// Builds a spec from `(field, rule)` pairs.
    ///
    /// # Errors
    ///
    /// Fails if a field of `T` has no rule, if a rule names a field `T` does
    /// not have, or if a field is given two rules.
    pub fn define<I, K>(rules: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = (K, FieldRule)>,
        K: Into<String>,
    {
        let mut builder = Self::builder();
        for (field, rule) in rules {
            builder = builder.rule(field, rule);
        }
        builder.build()
    }

    /// Iterates the target field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(field, _)| field)
    }

    /// Returns the rule for a target field.
    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rule)| rule)
    }

    /// Returns the type-erased rules, used for nesting.
    pub fn rule_set(&self) -> &Arc<RuleSet> {
        &self.rules
    }
}

/// Collects rules for a [`MappingSpec`] and validates them on `build`.
pub struct SpecBuilder<T> {
    rules: Vec<(String, FieldRule)>,
    _target: PhantomData<fn() -> T>,
}

impl<T: MappedRecord> SpecBuilder<T> {
    /// Adds the rule for one target field.
    pub fn rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.push((field.into(), rule));
        self
    }

    /// Adds `keep` rules for several fields whose source and target keys match.
    pub fn keep_all(mut self, fields: &[&str]) -> Self {
        for field in fields {
            self.rules.push(((*field).to_string(), FieldRule::keep()));
        }
        self
    }

    /// Validates the rules against `T::FIELDS` and freezes the spec.
    pub fn build(self) -> Result<MappingSpec<T>, MappingError> {
        let mut by_field: HashMap<String, FieldRule> = HashMap::with_capacity(self.rules.len());

        for (field, rule) in self.rules {
            if !T::FIELDS.contains(&field.as_str()) {
                return Err(MappingError::UnknownField {
                    target: T::TYPE_NAME,
                    field,
                });
            }
            if by_field.contains_key(&field) {
                return Err(MappingError::DuplicateRule {
                    target: T::TYPE_NAME,
                    field,
                });
            }
            by_field.insert(field, rule);
        }

        let mut ordered = Vec::with_capacity(T::FIELDS.len());
        for field in T::FIELDS {
            let rule = by_field
                .remove(*field)
                .ok_or_else(|| MappingError::MissingRule {
                    target: T::TYPE_NAME,
                    field: (*field).to_string(),
                })?;
            ordered.push((*field, rule));
        }

        tracing::debug!(
            target_type = T::TYPE_NAME,
            rules = ordered.len(),
            "Mapping spec defined"
        );

        Ok(MappingSpec {
            rules: Arc::new(RuleSet {
                target: T::TYPE_NAME,
                rules: ordered,
            }),
            _target: PhantomData,
        })
    }
}
