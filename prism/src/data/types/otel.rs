//! OpenTelemetry (OTLP/JSON) document types
//!
//! Field names follow the OTLP/JSON wire format. Every field is optional on
//! input so a partially populated export still loads; unknown span fields are
//! kept in `extra` so the `raw` view of a span shows what was received.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::TraceSpanAttribute;
use crate::utils::json;

/// `{ resourceSpans: [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryDocument {
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub resource_spans: Vec<OpenTelemetryResourceSpan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryResourceSpan {
    #[serde(default, deserialize_with = "json::lossy_default")]
    pub resource: OpenTelemetryResource,
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub scope_spans: Vec<OpenTelemetryScopeSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryResource {
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub attributes: Vec<TraceSpanAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryScopeSpan {
    #[serde(default, deserialize_with = "json::lossy_default")]
    pub scope: OpenTelemetryScope,
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub spans: Vec<OpenTelemetrySpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryScope {
    #[serde(default, deserialize_with = "json::string_default")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub version: Option<String>,
}

/// A single OTLP span.
///
/// Timestamps are decimal nanoseconds since the Unix epoch, kept as strings
/// because they exceed the exact integer range of an IEEE double.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetrySpan {
    #[serde(default, deserialize_with = "json::string_default")]
    pub trace_id: String,
    #[serde(default, deserialize_with = "json::string_default")]
    pub span_id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub parent_span_id: Option<String>,
    #[serde(default, deserialize_with = "json::string_default")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string_or_number"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "json::string_or_number_default")]
    pub start_time_unix_nano: String,
    #[serde(default, deserialize_with = "json::string_or_number_default")]
    pub end_time_unix_nano: String,
    #[serde(default, deserialize_with = "json::lossy_vec")]
    pub attributes: Vec<TraceSpanAttribute>,
    #[serde(default, deserialize_with = "json::lossy_default")]
    pub status: OpenTelemetryStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::unsigned"
    )]
    pub flags: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "json::lossy_vec"
    )]
    pub events: Vec<OpenTelemetryEvent>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "json::lossy_vec"
    )]
    pub links: Vec<OpenTelemetryLink>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub trace_state: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::unsigned"
    )]
    pub dropped_attributes_count: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::unsigned"
    )]
    pub dropped_events_count: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::unsigned"
    )]
    pub dropped_links_count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Span status. `code` is a `STATUS_CODE_*` name (numeric codes are also seen).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenTelemetryStatus {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string_or_number"
    )]
    pub code: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryEvent {
    #[serde(default, deserialize_with = "json::string_or_number_default")]
    pub time_unix_nano: String,
    #[serde(default, deserialize_with = "json::string_default")]
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "json::lossy_vec"
    )]
    pub attributes: Vec<TraceSpanAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTelemetryLink {
    #[serde(default, deserialize_with = "json::string_default")]
    pub trace_id: String,
    #[serde(default, deserialize_with = "json::string_default")]
    pub span_id: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "json::string"
    )]
    pub trace_state: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "json::lossy_vec"
    )]
    pub attributes: Vec<TraceSpanAttribute>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_parses_nested_spans() {
        let doc: OpenTelemetryDocument = serde_json::from_value(json!({
            "resourceSpans": [{
                "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "svc"}}]},
                "scopeSpans": [{
                    "scope": {"name": "openai"},
                    "spans": [{
                        "traceId": "t1",
                        "spanId": "s1",
                        "name": "chat",
                        "kind": "SPAN_KIND_CLIENT",
                        "startTimeUnixNano": "1704067200000000000",
                        "endTimeUnixNano": 1704067230000000000u64,
                        "attributes": [],
                        "status": {"code": "STATUS_CODE_OK"},
                        "flags": 1
                    }]
                }]
            }]
        }))
        .unwrap();

        let span = &doc.resource_spans[0].scope_spans[0].spans[0];
        assert_eq!(span.span_id, "s1");
        assert_eq!(span.parent_span_id, None);
        assert_eq!(span.start_time_unix_nano, "1704067200000000000");
        assert_eq!(span.end_time_unix_nano, "1704067230000000000");
        assert_eq!(span.status.code.as_deref(), Some("STATUS_CODE_OK"));
        assert_eq!(doc.resource_spans[0].scope_spans[0].scope.name, "openai");
    }

    #[test]
    fn test_span_tolerates_missing_and_mistyped_fields() {
        let span: OpenTelemetrySpan = serde_json::from_value(json!({
            "spanId": "s1",
            "attributes": "not-a-list",
            "status": {"code": null},
            "flags": "one"
        }))
        .unwrap();

        assert_eq!(span.span_id, "s1");
        assert!(span.attributes.is_empty());
        assert_eq!(span.status.code, None);
        assert_eq!(span.flags, None);
        assert_eq!(span.start_time_unix_nano, "");
    }

    #[test]
    fn test_span_keeps_unknown_fields() {
        let span: OpenTelemetrySpan = serde_json::from_value(json!({
            "spanId": "s1",
            "resource": {"custom": true}
        }))
        .unwrap();
        assert_eq!(span.extra.get("resource"), Some(&json!({"custom": true})));

        let back = serde_json::to_value(&span).unwrap();
        assert_eq!(back["resource"], json!({"custom": true}));
    }

    #[test]
    fn test_mistyped_nested_objects_keep_every_span() {
        let doc: OpenTelemetryDocument = serde_json::from_value(json!({
            "resourceSpans": [{
                "resource": null,
                "scopeSpans": [{
                    "scope": "openai",
                    "spans": [
                        {"spanId": "a", "status": {"code": "STATUS_CODE_OK"}},
                        {"spanId": "b", "status": null},
                        {"spanId": "c", "status": "OK"},
                        {"spanId": "d", "status": [2]}
                    ]
                }]
            }, {
                "resource": [1, 2],
                "scopeSpans": [{"scope": null, "spans": [{"spanId": "e"}]}]
            }]
        }))
        .unwrap();

        let ids: Vec<&str> = doc
            .resource_spans
            .iter()
            .flat_map(|rs| &rs.scope_spans)
            .flat_map(|ss| &ss.spans)
            .map(|span| span.span_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);

        let spans = &doc.resource_spans[0].scope_spans[0].spans;
        assert_eq!(spans[0].status.code.as_deref(), Some("STATUS_CODE_OK"));
        assert_eq!(spans[2].status, OpenTelemetryStatus::default());
        assert!(doc.resource_spans[1].resource.attributes.is_empty());
        assert_eq!(doc.resource_spans[0].scope_spans[0].scope.name, "");
    }
}
