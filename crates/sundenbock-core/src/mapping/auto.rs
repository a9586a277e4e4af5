//! Convention-based mapping for payloads that have no spec.
//!
//! Keys are renamed from `snake_case` to `camelCase`, recursively through
//! objects and arrays. ISO-8601 date-time strings are normalised to UTC the
//! same way [`parse_date`] does; other values are copied.

use serde_json::{Map, Value};

use super::convert::{is_iso_date_time, parse_date};

/// Recursively renames object keys from `snake_case` to `camelCase` and
/// normalises date-time strings.
pub fn auto_map(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(auto_map).collect()),
        Value::Object(record) => {
            let mut out = Map::with_capacity(record.len());
            for (key, inner) in record {
                out.insert(camel_case(key), auto_map(inner));
            }
            Value::Object(out)
        }
        Value::String(raw) if is_iso_date_time(raw) => parse_date(Some(value))
            .ok()
            .flatten()
            .unwrap_or_else(|| value.clone()),
        other => other.clone(),
    }
}

/// Converts `snake_case` to `camelCase`. Only `_` followed by a lowercase
/// ASCII letter is folded.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("created_date"), "createdDate");
        assert_eq!(camel_case("parent_comment_id"), "parentCommentId");
        assert_eq!(camel_case("already"), "already");
        assert_eq!(camel_case("trailing_"), "trailing_");
        assert_eq!(camel_case("x_1"), "x_1");
    }

    #[test]
    fn test_auto_map_recurses_and_keeps_values() {
        let out = auto_map(&json!({
            "ticket_key": "SB-1",
            "title": "2024-01-01 is not a timestamp",
            "child_comments": [ { "comment_text": "hi" } ]
        }));

        assert_eq!(
            out,
            json!({
                "ticketKey": "SB-1",
                "title": "2024-01-01 is not a timestamp",
                "childComments": [ { "commentText": "hi" } ]
            })
        );
    }

    #[test]
    fn test_auto_map_normalises_date_times() {
        let out = auto_map(&json!({
            "created_date": "2024-01-01T02:00:00+02:00",
            "child_comments": [ { "last_modified": "2024-03-05T10:15:30" } ],
            "broken_date": "2024-13-45Tnoon"
        }));

        assert_eq!(
            out,
            json!({
                "createdDate": "2024-01-01T00:00:00Z",
                "childComments": [ { "lastModified": "2024-03-05T10:15:30Z" } ],
                "brokenDate": "2024-13-45Tnoon"
            })
        );
        assert_eq!(
            out["createdDate"],
            parse_date(Some(&json!("2024-01-01T02:00:00+02:00"))).unwrap().unwrap()
        );
    }
}
