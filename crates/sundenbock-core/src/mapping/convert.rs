//! Reusable converters for `map` and `array` rules.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::error::MappingError;
use super::rule::ElementFn;

/// Parses an ISO-8601 timestamp string into a normalised UTC timestamp.
///
/// Absent and `null` sources map to an absent field. Anything else that is not
/// a valid timestamp is rejected.
pub fn parse_date(value: Option<&Value>) -> Result<Option<Value>, MappingError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => parse_timestamp(raw).map(Some),
        Some(other) => Err(MappingError::invalid(format!(
            "expected an ISO-8601 string, got {other}"
        ))),
    }
}

/// Like [`parse_date`], but an unparsable string maps to an absent field.
pub fn parse_optional_date(value: Option<&Value>) -> Result<Option<Value>, MappingError> {
    Ok(parse_date(value).ok().flatten())
}

/// Copies the value unchanged.
pub fn identity(value: Option<&Value>) -> Result<Option<Value>, MappingError> {
    Ok(value.cloned())
}

/// Chains two element converters: `first` then `second`.
pub fn compose(first: ElementFn, second: ElementFn) -> ElementFn {
    Arc::new(move |value: &Value| {
        let intermediate = first(value)?;
        second(&intermediate)
    })
}

/// Returns true if the string starts like an ISO-8601 date-time (`YYYY-MM-DDT`).
pub fn is_iso_date_time(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() > 10
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(u8::is_ascii_digit)
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(u8::is_ascii_digit)
        && bytes[10] == b'T'
}

fn parse_timestamp(raw: &str) -> Result<Value, MappingError> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Backends frequently omit the offset on LocalDateTime fields.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
        })
        .map_err(|e| MappingError::invalid(format!("'{raw}' is not a timestamp: {e}")))?;

    Ok(Value::String(
        parsed.to_rfc3339_opts(SecondsFormat::AutoSi, true),
    ))
}
