//! Langfuse observation adapter
//!
//! Langfuse exports carry an explicit observation `type`, so categories come
//! straight from a lookup table with no heuristic fallback.

use serde_json::Value as JsonValue;

use crate::data::types::{
    InputOutputData, LangfuseDocument, LangfuseObservation, ObservationLevel, ObservationType,
    SpanCategory, SpanStatus, TraceSpan,
};
use crate::utils::time::{iso_to_datetime, parse_iso_timestamp};

use super::adapter::{SpanAdapter, raw_json};
use super::tree::SpanLink;

/// Adapter for `{ trace, observations }` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct LangfuseSpanAdapter;

fn text_payload(value: Option<&JsonValue>) -> Option<String> {
    match value {
        Some(JsonValue::String(s)) => Some(s.clone()),
        _ => None,
    }
}

impl SpanAdapter for LangfuseSpanAdapter {
    type Document = LangfuseDocument;
    type RawSpan = LangfuseObservation;

    fn collect_raw_spans<'a>(
        &self,
        document: &'a LangfuseDocument,
        out: &mut Vec<&'a LangfuseObservation>,
    ) {
        out.extend(&document.observations);
    }

    fn span_link<'a>(&self, observation: &'a LangfuseObservation) -> SpanLink<'a> {
        SpanLink {
            id: &observation.id,
            parent_id: observation.parent_observation_id.as_deref(),
        }
    }

    fn convert_raw_span_to_trace_span(&self, observation: &LangfuseObservation) -> TraceSpan {
        let io = self.get_span_input_output(observation);

        TraceSpan {
            id: observation.id.clone(),
            title: observation.name.clone(),
            category: self.get_span_category(observation),
            status: self.get_span_status(observation),
            start_time: iso_to_datetime(observation.start_time.as_deref()),
            end_time: iso_to_datetime(observation.end_time.as_deref()),
            duration: self.get_span_duration(observation),
            cost: self.get_span_cost(observation),
            tokens_count: self.get_span_tokens_count(observation),
            input: io.input,
            output: io.output,
            raw: raw_json(observation),
            attributes: None,
            children: Vec::new(),
        }
    }

    fn get_span_duration(&self, observation: &LangfuseObservation) -> i64 {
        let start = observation.start_time.as_deref().and_then(parse_iso_timestamp);
        let end = observation.end_time.as_deref().and_then(parse_iso_timestamp);
        match (start, end) {
            (Some(start), Some(end)) => (end - start).num_milliseconds(),
            _ => 0,
        }
    }

    fn get_span_cost(&self, observation: &LangfuseObservation) -> f64 {
        observation
            .cost_details
            .as_ref()
            .and_then(|details| details.total)
            .unwrap_or(0.0)
    }

    fn get_span_tokens_count(&self, observation: &LangfuseObservation) -> f64 {
        observation
            .usage_details
            .as_ref()
            .and_then(|details| details.total)
            .unwrap_or(0.0)
    }

    /// Only string payloads are surfaced; structured ones stay in `raw`
    fn get_span_input_output(&self, observation: &LangfuseObservation) -> InputOutputData {
        InputOutputData {
            input: text_payload(observation.input.as_ref()),
            output: text_payload(observation.output.as_ref()),
        }
    }

    fn get_span_status(&self, observation: &LangfuseObservation) -> SpanStatus {
        observation
            .level
            .as_deref()
            .and_then(ObservationLevel::parse)
            .map_or(SpanStatus::Success, ObservationLevel::to_status)
    }

    fn get_span_category(&self, observation: &LangfuseObservation) -> SpanCategory {
        observation
            .observation_type
            .as_deref()
            .and_then(ObservationType::parse)
            .map_or(SpanCategory::Unknown, ObservationType::to_category)
    }
}
