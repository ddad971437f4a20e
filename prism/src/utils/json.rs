//! JSON utility functions
//!
//! Lenient `deserialize_with` helpers for third-party trace documents. A field
//! holding the wrong JSON type deserializes to `None` instead of failing the
//! whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Accept a JSON string or number, as a string. Anything else is `None`.
///
/// OTLP/JSON exporters disagree on whether 64-bit values (`intValue`,
/// `startTimeUnixNano`) are quoted, so both encodings are accepted.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::String(s)) => Some(s),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`string_or_number`] but defaults to an empty string.
pub fn string_or_number_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_number(deserializer).map(Option::unwrap_or_default)
}

/// Accept a JSON number only. Strings are not coerced.
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::Number(n)) => n.as_f64(),
        _ => None,
    })
}

/// Accept a non-negative JSON integer only.
pub fn unsigned<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::Number(n)) => n.as_u64(),
        _ => None,
    })
}

/// Accept a JSON boolean only.
pub fn boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::Bool(b)) => Some(b),
        _ => None,
    })
}

/// Accept a JSON string only.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::String(s)) => Some(s),
        _ => None,
    })
}

/// Like [`string`] but defaults to an empty string.
pub fn string_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string(deserializer).map(Option::unwrap_or_default)
}

/// Accept a JSON array, skipping elements that fail to deserialize as `T`.
/// A non-array value yields an empty list.
pub fn lossy_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed array element");
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Deserialize a nested object as `T`, falling back to `T::default()` when the
/// value has the wrong shape. `null` and a missing field also give the default.
pub fn lossy_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring malformed nested object");
            T::default()
        }),
        None => T::default(),
    })
}
