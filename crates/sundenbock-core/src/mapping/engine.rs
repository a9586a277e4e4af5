//! The mapping interpreter.

use serde::Serialize;
use serde_json::{Map, Value};

use super::error::MappingError;
use super::rule::{ElementMap, FieldRule};
use super::spec::{MappedRecord, MappingSpec, RuleSet};
use crate::paging::Page;

/// Maps one source record into a `T` according to `spec`.
///
/// The source is only read. Converter failures abort the whole call and are
/// returned with the failing field path attached.
pub fn transform<S, T>(source: &S, spec: &MappingSpec<T>) -> Result<T, MappingError>
where
    S: Serialize + ?Sized,
    T: MappedRecord,
{
    let value = serde_json::to_value(source).map_err(|e| MappingError::Decode {
        target: T::TYPE_NAME,
        message: e.to_string(),
    })?;
    let mapped = transform_value(&value, spec.rule_set())?;
    serde_json::from_value(mapped).map_err(|e| MappingError::Decode {
        target: T::TYPE_NAME,
        message: e.to_string(),
    })
}

/// Maps every item of a page, passing `total`, `page` and `page_size` through.
pub fn transform_collection<S, T>(
    source: &Page<S>,
    item_spec: &MappingSpec<T>,
) -> Result<Page<T>, MappingError>
where
    S: Serialize,
    T: MappedRecord,
{
    let items = source
        .items
        .iter()
        .map(|item| transform(item, item_spec))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        items,
        total: source.total,
        page: source.page,
        page_size: source.page_size,
    })
}

/// Maps an untyped JSON record with a rule set.
pub fn transform_value(source: &Value, rules: &RuleSet) -> Result<Value, MappingError> {
    let record = source.as_object().ok_or(MappingError::Shape {
        target: rules.target(),
        expected: "an object",
    })?;

    let mut out = Map::with_capacity(rules.len());

    for (field, rule) in rules.iter() {
        let Some(key) = rule.source_key(field) else {
            continue;
        };
        let input = record.get(key);

        match rule {
            FieldRule::Omit => {}
            FieldRule::Keep { .. } | FieldRule::Rename { .. } => {
                if let Some(value) = input {
                    out.insert(field.to_string(), value.clone());
                }
            }
            FieldRule::MapScalar { map, .. } => {
                if let Some(value) = map(input).map_err(|e| e.at_field(field))? {
                    out.insert(field.to_string(), value);
                }
            }
            FieldRule::MapArray { map, .. } => {
                let items = match input {
                    Some(Value::Array(items)) => items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| {
                            map_element(map, item, rules)
                                .map_err(|e| e.at_field(&format!("{field}[{index}]")))
                        })
                        .collect::<Result<Vec<_>, _>>()?,
                    _ => Vec::new(),
                };
                out.insert(field.to_string(), Value::Array(items));
            }
            FieldRule::MapNested { spec, .. } => match input {
                None => {}
                Some(Value::Null) => {
                    out.insert(field.to_string(), Value::Null);
                }
                Some(value) => {
                    let nested = transform_value(value, spec).map_err(|e| e.at_field(field))?;
                    out.insert(field.to_string(), nested);
                }
            },
        }
    }

    Ok(Value::Object(out))
}

fn map_element(map: &ElementMap, item: &Value, owner: &RuleSet) -> Result<Value, MappingError> {
    match map {
        ElementMap::Func(f) => f(item),
        ElementMap::Spec(rules) => transform_value(item, rules),
        ElementMap::Recursive => transform_value(item, owner),
    }
}
