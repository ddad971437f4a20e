//! OpenTelemetry span adapter
//!
//! Normalizes OTLP/JSON spans. Three attribute conventions are recognized:
//!
//! 1. GenAI semantic conventions: `gen_ai.operation.name`, `gen_ai.system`
//! 2. OpenInference: `openinference.span.kind`, `llm.model_name`
//! 3. Standard: no AI annotations, classified from the span name and
//!    `function.name` / `http.method` / `db.system`
//!
//! Metrics read `gen_ai.usage.*`; text payloads read `input.value` and
//! `output.value`.

mod attributes;
mod classify;
#[cfg(test)]
mod mock;

use std::borrow::Cow;

use crate::data::types::{
    InputOutputData, OpenTelemetryDocument, OpenTelemetrySpan, SpanCategory, SpanStatus,
    TraceSpan,
};
use crate::utils::time::{nanos_str_to_datetime, parse_nanos};

use super::adapter::{SpanAdapter, raw_json};
use super::tree::SpanLink;

pub use attributes::{
    AttributeValue, format_number, get_attribute_value, get_number_attribute,
    get_string_attribute, has_attribute, has_truthy_attribute, parse_float,
};
pub use classify::{
    categorize_gen_ai, categorize_open_inference, categorize_standard, classify_span,
    detect_standard,
};

// ============================================================================
// ATTRIBUTE KEYS
// ============================================================================

pub mod keys {
    // GenAI semantic conventions
    pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";
    pub const GEN_AI_SYSTEM: &str = "gen_ai.system";
    pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";
    pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";
    pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";
    pub const GEN_AI_USAGE_TOTAL_TOKENS: &str = "gen_ai.usage.total_tokens";
    pub const GEN_AI_USAGE_INPUT_COST: &str = "gen_ai.usage.input_cost";
    pub const GEN_AI_USAGE_OUTPUT_COST: &str = "gen_ai.usage.output_cost";
    pub const GEN_AI_USAGE_COST: &str = "gen_ai.usage.cost";

    // OpenInference
    pub const OPENINFERENCE_SPAN_KIND: &str = "openinference.span.kind";
    pub const LLM_MODEL_NAME: &str = "llm.model_name";
    pub const INPUT_VALUE: &str = "input.value";
    pub const OUTPUT_VALUE: &str = "output.value";

    // Standard semantic conventions
    pub const HTTP_METHOD: &str = "http.method";
    pub const HTTP_URL: &str = "http.url";
    pub const DB_SYSTEM: &str = "db.system";
    pub const DB_OPERATION_NAME: &str = "db.operation.name";
    pub const DB_COLLECTION_NAME: &str = "db.collection.name";
    pub const FUNCTION_NAME: &str = "function.name";
}

// ============================================================================
// TITLE
// ============================================================================

/// Human-readable label: model, then database collection/operation, then
/// HTTP method/URL, then the span name. Each source needs truthy values.
pub fn generate_span_title(span: &OpenTelemetrySpan) -> String {
    let attrs = span.attributes.as_slice();
    let truthy = |key: &str| get_attribute_value(attrs, key).filter(|v| v.is_truthy());

    if let Some(model) = truthy(keys::GEN_AI_REQUEST_MODEL) {
        return format!("{model} - {}", span.name);
    }
    if let (Some(collection), Some(operation)) = (
        truthy(keys::DB_COLLECTION_NAME),
        truthy(keys::DB_OPERATION_NAME),
    ) {
        return format!("{collection} - {operation}");
    }
    if let (Some(method), Some(url)) = (truthy(keys::HTTP_METHOD), truthy(keys::HTTP_URL)) {
        return format!("{method} {url}");
    }
    span.name.clone()
}

// ============================================================================
// ADAPTER
// ============================================================================

/// Adapter for OTLP/JSON documents (`resourceSpans` → `scopeSpans` → `spans`)
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenTelemetrySpanAdapter;

impl SpanAdapter for OpenTelemetrySpanAdapter {
    type Document = OpenTelemetryDocument;
    type RawSpan = OpenTelemetrySpan;

    fn collect_raw_spans<'a>(
        &self,
        document: &'a OpenTelemetryDocument,
        out: &mut Vec<&'a OpenTelemetrySpan>,
    ) {
        out.extend(
            document
                .resource_spans
                .iter()
                .flat_map(|rs| &rs.scope_spans)
                .flat_map(|ss| &ss.spans),
        );
    }

    fn span_link<'a>(&self, span: &'a OpenTelemetrySpan) -> SpanLink<'a> {
        SpanLink {
            id: &span.span_id,
            parent_id: span.parent_span_id.as_deref(),
        }
    }

    fn convert_raw_span_to_trace_span(&self, span: &OpenTelemetrySpan) -> TraceSpan {
        let io = self.get_span_input_output(span);

        TraceSpan {
            id: span.span_id.clone(),
            title: generate_span_title(span),
            category: self.get_span_category(span),
            status: self.get_span_status(span),
            start_time: nanos_str_to_datetime(&span.start_time_unix_nano),
            end_time: nanos_str_to_datetime(&span.end_time_unix_nano),
            duration: self.get_span_duration(span),
            cost: self.get_span_cost(span),
            tokens_count: self.get_span_tokens_count(span),
            input: io.input,
            output: io.output,
            raw: raw_json(span),
            attributes: Some(span.attributes.clone()),
            children: Vec::new(),
        }
    }

    /// Nanosecond difference truncated to whole milliseconds
    fn get_span_duration(&self, span: &OpenTelemetrySpan) -> i64 {
        match (
            parse_nanos(&span.start_time_unix_nano),
            parse_nanos(&span.end_time_unix_nano),
        ) {
            (Some(start), Some(end)) => {
                i64::try_from((end - start) / 1_000_000).unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// `input_cost + output_cost`, or `gen_ai.usage.cost` when that sum is 0
    fn get_span_cost(&self, span: &OpenTelemetrySpan) -> f64 {
        let attrs = &span.attributes;
        let input = get_number_attribute(attrs, keys::GEN_AI_USAGE_INPUT_COST).unwrap_or(0.0);
        let output = get_number_attribute(attrs, keys::GEN_AI_USAGE_OUTPUT_COST).unwrap_or(0.0);

        let total = input + output;
        if total == 0.0 {
            if let Some(fallback) = get_number_attribute(attrs, keys::GEN_AI_USAGE_COST) {
                return fallback;
            }
        }
        total
    }

    /// `total_tokens` when numeric, else `input_tokens + output_tokens`
    fn get_span_tokens_count(&self, span: &OpenTelemetrySpan) -> f64 {
        let attrs = &span.attributes;
        if let Some(total) = get_number_attribute(attrs, keys::GEN_AI_USAGE_TOTAL_TOKENS) {
            return total;
        }
        get_number_attribute(attrs, keys::GEN_AI_USAGE_INPUT_TOKENS).unwrap_or(0.0)
            + get_number_attribute(attrs, keys::GEN_AI_USAGE_OUTPUT_TOKENS).unwrap_or(0.0)
    }

    fn get_span_input_output(&self, span: &OpenTelemetrySpan) -> InputOutputData {
        let attrs = &span.attributes;
        InputOutputData {
            input: get_string_attribute(attrs, keys::INPUT_VALUE).map(Cow::into_owned),
            output: get_string_attribute(attrs, keys::OUTPUT_VALUE).map(Cow::into_owned),
        }
    }

    /// OK is success, ERROR is error, anything else (unset, missing) is a warning
    fn get_span_status(&self, span: &OpenTelemetrySpan) -> SpanStatus {
        match span.status.code.as_deref() {
            Some("STATUS_CODE_OK" | "1") => SpanStatus::Success,
            Some("STATUS_CODE_ERROR" | "2") => SpanStatus::Error,
            _ => SpanStatus::Warning,
        }
    }

    fn get_span_category(&self, span: &OpenTelemetrySpan) -> SpanCategory {
        classify_span(&span.name, &span.attributes)
    }
}
