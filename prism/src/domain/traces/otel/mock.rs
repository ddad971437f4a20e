//! Span builder for adapter and classifier tests

use serde_json::Value as JsonValue;

use crate::data::types::{
    OpenTelemetrySpan, OpenTelemetryStatus, TraceSpanAttribute, TraceSpanAttributeValue,
};

use super::format_number;

const START_SECONDS: u64 = 1_640_995_200;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

pub struct MockSpanBuilder {
    name: String,
    duration_secs: u64,
    duration_nanos: u64,
    attributes: Vec<TraceSpanAttribute>,
    status: String,
}

pub fn mock_span() -> MockSpanBuilder {
    MockSpanBuilder {
        name: "test-span".to_string(),
        duration_secs: 2,
        duration_nanos: 0,
        attributes: Vec::new(),
        status: "STATUS_CODE_OK".to_string(),
    }
}

impl MockSpanBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn duration(mut self, secs: u64, nanos: u64) -> Self {
        self.duration_secs = secs;
        self.duration_nanos = nanos;
        self
    }

    /// Encode a JSON value the way loosely typed exporters do: numbers as
    /// `intValue`, arrays flattened into a joined `stringValue`, null as an
    /// empty value.
    pub fn attr(mut self, key: &str, value: JsonValue) -> Self {
        let value = match value {
            JsonValue::Null => TraceSpanAttributeValue::default(),
            JsonValue::Bool(b) => TraceSpanAttributeValue::bool(b),
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) => TraceSpanAttributeValue::int(format_number(f)),
                None => TraceSpanAttributeValue::int(n),
            },
            JsonValue::String(s) => TraceSpanAttributeValue::string(s),
            JsonValue::Array(items) => TraceSpanAttributeValue::string(
                items
                    .iter()
                    .map(|item| match item {
                        JsonValue::String(s) => s.clone(),
                        JsonValue::Null => String::new(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            JsonValue::Object(_) => TraceSpanAttributeValue::string(value.to_string()),
        };
        self.attributes.push(TraceSpanAttribute::new(key, value));
        self
    }

    /// `intValue` carrying arbitrary text, e.g. `"NaN"`
    pub fn int_attr(mut self, key: &str, raw: &str) -> Self {
        self.attributes
            .push(TraceSpanAttribute::new(key, TraceSpanAttributeValue::int(raw)));
        self
    }

    pub fn status(mut self, code: &str) -> Self {
        self.status = code.to_string();
        self
    }

    pub fn build(self) -> OpenTelemetrySpan {
        let start = START_SECONDS * NANOS_PER_SECOND;
        let end = (START_SECONDS + self.duration_secs) * NANOS_PER_SECOND + self.duration_nanos;

        OpenTelemetrySpan {
            trace_id: "test-trace-id".to_string(),
            span_id: "test-span-id".to_string(),
            name: self.name,
            kind: Some("SPAN_KIND_INTERNAL".to_string()),
            start_time_unix_nano: start.to_string(),
            end_time_unix_nano: end.to_string(),
            attributes: self.attributes,
            status: OpenTelemetryStatus {
                code: Some(self.status),
                message: None,
            },
            flags: Some(1),
            ..Default::default()
        }
    }
}
