//! Normalized span model
//!
//! `TraceSpan` is the single artifact adapters hand to downstream consumers
//! (timeline rendering, aggregation). `TraceSpanAttribute` keeps the original
//! OpenTelemetry key/value encoding so it can be displayed as received.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SpanCategory, SpanStatus};
use crate::utils::json;

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// One `{key, value}` entry of an OpenTelemetry attribute list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSpanAttribute {
    #[serde(default, deserialize_with = "json::string_default")]
    pub key: String,
    #[serde(default, deserialize_with = "json::lossy_default")]
    pub value: TraceSpanAttributeValue,
}

impl TraceSpanAttribute {
    pub fn new(key: impl Into<String>, value: TraceSpanAttributeValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Union-encoded attribute value. At most one field is expected to be set.
///
/// `intValue` is carried as a decimal string and read back as a float, so it
/// encodes both integers and decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSpanAttributeValue {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub string_value: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string_or_number"
    )]
    pub int_value: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::boolean"
    )]
    pub bool_value: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::number"
    )]
    pub double_value: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::lossy_default"
    )]
    pub array_value: Option<ArrayValue>,
}

impl TraceSpanAttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string_value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn int(value: impl ToString) -> Self {
        Self {
            int_value: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn bool(value: bool) -> Self {
        Self {
            bool_value: Some(value),
            ..Default::default()
        }
    }

    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Default::default()
        }
    }

    pub fn array(values: Vec<TraceSpanAttributeValue>) -> Self {
        Self {
            array_value: Some(ArrayValue { values }),
            ..Default::default()
        }
    }
}

/// OTLP `arrayValue` wrapper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub values: Vec<TraceSpanAttributeValue>,
}

// ============================================================================
// TRACE SPAN
// ============================================================================

/// Text payloads extracted from a raw span
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOutputData {
    pub input: Option<String>,
    pub output: Option<String>,
}

/// Canonical span produced by every adapter.
///
/// `cost` and `tokens_count` use 0 as the "not reported" sentinel.
/// `duration` is `end_time - start_time` in milliseconds and is negative when
/// the source timestamps are inverted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSpan {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub category: SpanCategory,
    pub status: SpanStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i64,
    pub cost: f64,
    pub tokens_count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<TraceSpanAttribute>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TraceSpan>,
}
