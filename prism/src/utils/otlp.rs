//! OTLP utility functions
//!
//! Bridges binary OTLP protobuf exports to the OTLP/JSON document model so a
//! protobuf export goes through the same adapter as a JSON one:
//! - ids are lowercase hex
//! - timestamps are decimal nanosecond strings
//! - span kind and status code become their `SPAN_KIND_*` / `STATUS_CODE_*` names

use opentelemetry_proto::tonic::collector::trace::v1::ExportTraceServiceRequest;
use opentelemetry_proto::tonic::common::v1::{AnyValue, KeyValue, any_value};
use opentelemetry_proto::tonic::trace::v1::{ResourceSpans, ScopeSpans, Span, span};
use prost::Message;

use crate::data::types::{
    OpenTelemetryDocument, OpenTelemetryEvent, OpenTelemetryLink, OpenTelemetryResource,
    OpenTelemetryResourceSpan, OpenTelemetryScope, OpenTelemetryScopeSpan, OpenTelemetrySpan,
    OpenTelemetryStatus, TraceSpanAttribute, TraceSpanAttributeValue,
};

// ============================================================================
// ENUM NAMES
// ============================================================================

pub fn span_kind_to_string(kind: i32) -> &'static str {
    match kind {
        0 => "SPAN_KIND_UNSPECIFIED",
        1 => "SPAN_KIND_INTERNAL",
        2 => "SPAN_KIND_SERVER",
        3 => "SPAN_KIND_CLIENT",
        4 => "SPAN_KIND_PRODUCER",
        5 => "SPAN_KIND_CONSUMER",
        _ => "SPAN_KIND_UNSPECIFIED",
    }
}

pub fn status_code_to_string(code: i32) -> &'static str {
    match code {
        1 => "STATUS_CODE_OK",
        2 => "STATUS_CODE_ERROR",
        _ => "STATUS_CODE_UNSET",
    }
}

// ============================================================================
// ATTRIBUTE CONVERSION
// ============================================================================

/// Convert AnyValue to the OTLP/JSON union encoding.
///
/// Key-value lists and bytes have no slot in the union and become an empty
/// value, which attribute lookups treat as absent.
pub fn any_value_to_attribute_value(value: &AnyValue) -> TraceSpanAttributeValue {
    match &value.value {
        Some(any_value::Value::StringValue(s)) => TraceSpanAttributeValue::string(s.as_str()),
        Some(any_value::Value::BoolValue(b)) => TraceSpanAttributeValue::bool(*b),
        Some(any_value::Value::IntValue(i)) => TraceSpanAttributeValue::int(i),
        Some(any_value::Value::DoubleValue(d)) => TraceSpanAttributeValue::double(*d),
        Some(any_value::Value::ArrayValue(arr)) => TraceSpanAttributeValue::array(
            arr.values.iter().map(any_value_to_attribute_value).collect(),
        ),
        Some(any_value::Value::KvlistValue(_)) | Some(any_value::Value::BytesValue(_)) | None => {
            TraceSpanAttributeValue::default()
        }
    }
}

/// Convert a KeyValue list, preserving order. Entries without a value keep
/// their key with an empty value.
pub fn key_values_to_attributes(attrs: &[KeyValue]) -> Vec<TraceSpanAttribute> {
    attrs
        .iter()
        .map(|kv| {
            let value = kv
                .value
                .as_ref()
                .map(any_value_to_attribute_value)
                .unwrap_or_default();
            TraceSpanAttribute::new(kv.key.as_str(), value)
        })
        .collect()
}

// ============================================================================
// REQUEST CONVERSION
// ============================================================================

/// Decode a binary `ExportTraceServiceRequest`
pub fn decode_trace_request(bytes: &[u8]) -> Result<ExportTraceServiceRequest, prost::DecodeError> {
    ExportTraceServiceRequest::decode(bytes)
}

/// Convert a decoded export request into an OTLP/JSON document
pub fn export_request_to_document(request: &ExportTraceServiceRequest) -> OpenTelemetryDocument {
    OpenTelemetryDocument {
        resource_spans: request.resource_spans.iter().map(convert_resource_spans).collect(),
    }
}

fn convert_resource_spans(resource_spans: &ResourceSpans) -> OpenTelemetryResourceSpan {
    OpenTelemetryResourceSpan {
        resource: OpenTelemetryResource {
            attributes: resource_spans
                .resource
                .as_ref()
                .map(|r| key_values_to_attributes(&r.attributes))
                .unwrap_or_default(),
        },
        scope_spans: resource_spans.scope_spans.iter().map(convert_scope_spans).collect(),
        schema_url: non_empty(&resource_spans.schema_url),
    }
}

fn convert_scope_spans(scope_spans: &ScopeSpans) -> OpenTelemetryScopeSpan {
    let scope = scope_spans
        .scope
        .as_ref()
        .map(|s| OpenTelemetryScope {
            name: s.name.clone(),
            version: non_empty(&s.version),
        })
        .unwrap_or_default();

    OpenTelemetryScopeSpan {
        scope,
        spans: scope_spans.spans.iter().map(convert_span).collect(),
        schema_url: non_empty(&scope_spans.schema_url),
    }
}

fn convert_span(span: &Span) -> OpenTelemetrySpan {
    let status = span
        .status
        .as_ref()
        .map(|s| OpenTelemetryStatus {
            code: Some(status_code_to_string(s.code).to_string()),
            message: non_empty(&s.message),
        })
        .unwrap_or_default();

    OpenTelemetrySpan {
        trace_id: hex::encode(&span.trace_id),
        span_id: hex::encode(&span.span_id),
        parent_span_id: if span.parent_span_id.is_empty() {
            None
        } else {
            Some(hex::encode(&span.parent_span_id))
        },
        name: span.name.clone(),
        kind: Some(span_kind_to_string(span.kind).to_string()),
        start_time_unix_nano: span.start_time_unix_nano.to_string(),
        end_time_unix_nano: span.end_time_unix_nano.to_string(),
        attributes: key_values_to_attributes(&span.attributes),
        status,
        flags: Some(u64::from(span.flags)),
        events: span.events.iter().map(convert_event).collect(),
        links: span.links.iter().map(convert_link).collect(),
        trace_state: non_empty(&span.trace_state),
        dropped_attributes_count: Some(u64::from(span.dropped_attributes_count)),
        dropped_events_count: Some(u64::from(span.dropped_events_count)),
        dropped_links_count: Some(u64::from(span.dropped_links_count)),
        extra: Default::default(),
    }
}

fn convert_event(event: &span::Event) -> OpenTelemetryEvent {
    OpenTelemetryEvent {
        time_unix_nano: event.time_unix_nano.to_string(),
        name: event.name.clone(),
        attributes: key_values_to_attributes(&event.attributes),
    }
}

fn convert_link(link: &span::Link) -> OpenTelemetryLink {
    OpenTelemetryLink {
        trace_id: hex::encode(&link.trace_id),
        span_id: hex::encode(&link.span_id),
        trace_state: non_empty(&link.trace_state),
        attributes: key_values_to_attributes(&link.attributes),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry_proto::tonic::common::v1::{ArrayValue, InstrumentationScope, KeyValueList};
    use opentelemetry_proto::tonic::resource::v1::Resource;
    use opentelemetry_proto::tonic::trace::v1::Status;

    fn make_any_value(value: any_value::Value) -> AnyValue {
        AnyValue { value: Some(value) }
    }

    fn make_kv(key: &str, value: any_value::Value) -> KeyValue {
        KeyValue {
            key: key.to_string(),
            value: Some(make_any_value(value)),
        }
    }

    fn make_request() -> ExportTraceServiceRequest {
        let span = Span {
            trace_id: vec![0xab; 16],
            span_id: vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08],
            parent_span_id: vec![],
            name: "chat gpt-4".to_string(),
            kind: 3,
            start_time_unix_nano: 1_704_067_200_000_000_000,
            end_time_unix_nano: 1_704_067_230_000_000_000,
            attributes: vec![
                make_kv(
                    "gen_ai.operation.name",
                    any_value::Value::StringValue("chat".to_string()),
                ),
                make_kv("gen_ai.usage.input_tokens", any_value::Value::IntValue(100)),
            ],
            status: Some(Status {
                message: String::new(),
                code: 2,
            }),
            ..Default::default()
        };

        ExportTraceServiceRequest {
            resource_spans: vec![ResourceSpans {
                resource: Some(Resource {
                    attributes: vec![make_kv(
                        "service.name",
                        any_value::Value::StringValue("svc".to_string()),
                    )],
                    ..Default::default()
                }),
                scope_spans: vec![ScopeSpans {
                    scope: Some(InstrumentationScope {
                        name: "openai".to_string(),
                        version: "1.0".to_string(),
                        ..Default::default()
                    }),
                    spans: vec![span],
                    schema_url: String::new(),
                }],
                schema_url: String::new(),
            }],
        }
    }

    #[test]
    fn test_span_kind_to_string() {
        assert_eq!(span_kind_to_string(1), "SPAN_KIND_INTERNAL");
        assert_eq!(span_kind_to_string(3), "SPAN_KIND_CLIENT");
        assert_eq!(span_kind_to_string(99), "SPAN_KIND_UNSPECIFIED");
    }

    #[test]
    fn test_status_code_to_string() {
        assert_eq!(status_code_to_string(0), "STATUS_CODE_UNSET");
        assert_eq!(status_code_to_string(1), "STATUS_CODE_OK");
        assert_eq!(status_code_to_string(2), "STATUS_CODE_ERROR");
    }

    #[test]
    fn test_any_value_int_becomes_decimal_string() {
        let value = any_value_to_attribute_value(&make_any_value(any_value::Value::IntValue(-42)));
        assert_eq!(value.int_value.as_deref(), Some("-42"));
        assert_eq!(value.string_value, None);
    }

    #[test]
    fn test_any_value_double_and_array() {
        let double = any_value_to_attribute_value(&make_any_value(any_value::Value::DoubleValue(0.5)));
        assert_eq!(double.double_value, Some(0.5));

        let arr = make_any_value(any_value::Value::ArrayValue(ArrayValue {
            values: vec![
                make_any_value(any_value::Value::StringValue("a".to_string())),
                make_any_value(any_value::Value::BoolValue(true)),
            ],
        }));
        let values = any_value_to_attribute_value(&arr).array_value.unwrap().values;
        assert_eq!(values[0].string_value.as_deref(), Some("a"));
        assert_eq!(values[1].bool_value, Some(true));
    }

    #[test]
    fn test_any_value_kvlist_and_bytes_are_empty() {
        let kvlist = make_any_value(any_value::Value::KvlistValue(KeyValueList { values: vec![] }));
        assert_eq!(
            any_value_to_attribute_value(&kvlist),
            TraceSpanAttributeValue::default()
        );
        let bytes = make_any_value(any_value::Value::BytesValue(vec![1, 2]));
        assert_eq!(
            any_value_to_attribute_value(&bytes),
            TraceSpanAttributeValue::default()
        );
    }

    #[test]
    fn test_key_values_keep_order_and_missing_values() {
        let attrs = key_values_to_attributes(&[
            make_kv("b", any_value::Value::BoolValue(false)),
            KeyValue {
                key: "a".to_string(),
                value: None,
            },
        ]);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].key, "b");
        assert_eq!(attrs[1].key, "a");
        assert_eq!(attrs[1].value, TraceSpanAttributeValue::default());
    }

    #[test]
    fn test_decode_and_convert_request() {
        let bytes = make_request().encode_to_vec();
        let request = decode_trace_request(&bytes).unwrap();
        let doc = export_request_to_document(&request);

        let scope_spans = &doc.resource_spans[0].scope_spans[0];
        assert_eq!(scope_spans.scope.name, "openai");
        assert_eq!(scope_spans.scope.version.as_deref(), Some("1.0"));

        let span = &scope_spans.spans[0];
        assert_eq!(span.trace_id, "ab".repeat(16));
        assert_eq!(span.span_id, "0102030405060708");
        assert_eq!(span.parent_span_id, None);
        assert_eq!(span.kind.as_deref(), Some("SPAN_KIND_CLIENT"));
        assert_eq!(span.start_time_unix_nano, "1704067200000000000");
        assert_eq!(span.end_time_unix_nano, "1704067230000000000");
        assert_eq!(span.status.code.as_deref(), Some("STATUS_CODE_ERROR"));
        assert_eq!(span.attributes[1].value.int_value.as_deref(), Some("100"));
        assert_eq!(
            doc.resource_spans[0].resource.attributes[0].key,
            "service.name"
        );
    }

    #[test]
    fn test_missing_status_leaves_code_unset() {
        let mut request = make_request();
        request.resource_spans[0].scope_spans[0].spans[0].status = None;
        let doc = export_request_to_document(&request);
        assert_eq!(doc.resource_spans[0].scope_spans[0].spans[0].status.code, None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_trace_request(&[0xff, 0xff, 0xff]).is_err());
    }
}
