//! Langfuse export document types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::utils::json;

/// `{ trace, observations: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LangfuseDocument {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::lossy_default"
    )]
    pub trace: Option<LangfuseTrace>,
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub observations: Vec<LangfuseObservation>,
}

/// Trace header. Only informational; observations carry the span data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LangfuseTrace {
    #[serde(default, deserialize_with = "json::string_default")]
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub timestamp: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub session_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// One observation (span, generation, event, ...).
///
/// Timestamps are ISO-8601 strings. `input`/`output`/`metadata` keep their raw
/// JSON so non-string payloads survive into `raw`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LangfuseObservation {
    #[serde(default, deserialize_with = "json::string_default")]
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub trace_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub parent_observation_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub start_time: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "json::string_default")]
    pub name: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub observation_type: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub status_message: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub model: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::lossy_default"
    )]
    pub usage_details: Option<LangfuseDetails>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::lossy_default"
    )]
    pub cost_details: Option<LangfuseDetails>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Shape shared by `usageDetails` (token counts) and `costDetails` (money).
/// Non-numeric entries read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LangfuseDetails {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::number"
    )]
    pub input: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::number"
    )]
    pub output: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::number"
    )]
    pub total: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::number"
    )]
    pub input_cached_tokens: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::number"
    )]
    pub output_reasoning_tokens: Option<f64>,
}
