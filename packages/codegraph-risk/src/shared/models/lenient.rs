//! Lenient field deserializers
//!
//! Upstream rows are produced by several extractors; a single bad entry must
//! not make the whole chunk unreadable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Array of `T`, skipping entries that fail to deserialize. Non-arrays yield empty.
pub fn vec_skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Single object or array of objects
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        Value::Object(_) => serde_json::from_value(value).ok().into_iter().collect(),
        _ => Vec::new(),
    })
}

/// Array of scalars rendered as strings; nulls and nested values are dropped
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items.into_iter().filter_map(scalar_to_string).collect())
}

/// Finite JSON number; strings and everything else are `None`
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|n| n.is_finite()))
}

/// Finite integral number, or a numeric string
pub fn opt_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64))
}

/// String value; `null` and mistyped values are `None`
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// `T` if the value deserializes, otherwise `None`
pub fn opt_skip_invalid<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// `T` if the value deserializes; `null` and mistyped values become `T::default()`
pub fn default_on_invalid<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(opt_skip_invalid(deserializer)?.unwrap_or_default())
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "string_list")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "opt_number")]
        confidence: Option<f64>,
        #[serde(default, deserialize_with = "opt_integer")]
        line: Option<i64>,
        #[serde(default, deserialize_with = "vec_skip_invalid")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "opt_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "default_on_invalid")]
        nested: Vec<u32>,
    }

    #[test]
    fn test_lenient_fields() {
        let fields: Fields = serde_json::from_str(
            r#"{"tags": ["a", null, 3, {"x": 1}], "confidence": 0.5, "line": "4", "items": [1, "x", 2], "name": "h", "nested": [3]}"#,
        )
        .unwrap();
        assert_eq!(fields.tags, vec!["a", "3"]);
        assert_eq!(fields.confidence, Some(0.5));
        assert_eq!(fields.line, Some(4));
        assert_eq!(fields.items, vec![1, 2]);
        assert_eq!(fields.name.as_deref(), Some("h"));
        assert_eq!(fields.nested, vec![3]);
    }

    #[test]
    fn test_confidence_requires_json_number() {
        let fields: Fields = serde_json::from_str(r#"{"confidence": "0.9"}"#).unwrap();
        assert_eq!(fields.confidence, None);
    }

    #[test]
    fn test_null_and_mistyped_fall_back() {
        let fields: Fields =
            serde_json::from_str(r#"{"name": 12, "nested": null, "line": null}"#).unwrap();
        assert_eq!(fields.name, None);
        assert!(fields.nested.is_empty());
        assert_eq!(fields.line, None);

        let fields: Fields = serde_json::from_str(r#"{"nested": "oops"}"#).unwrap();
        assert!(fields.nested.is_empty());
    }

    #[test]
    fn test_non_arrays_become_empty() {
        let fields: Fields =
            serde_json::from_str(r#"{"tags": "oops", "items": {"a": 1}, "confidence": "high"}"#)
                .unwrap();
        assert!(fields.tags.is_empty());
        assert!(fields.items.is_empty());
        assert_eq!(fields.confidence, None);
        assert_eq!(fields.line, None);
    }
}
