//! Adapter capability shared by every input format.

use serde::Serialize;

use crate::data::types::{InputOutputData, SpanCategory, SpanStatus, TraceSpan};

use super::tree::{SpanLink, build_span_tree};

/// Converts one raw trace format into normalized `TraceSpan` trees.
///
/// Implementations are stateless; every method is a pure function of its
/// input. Only the format-specific parts are required, tree assembly is shared.
pub trait SpanAdapter {
    type Document;
    type RawSpan: Serialize;

    /// Append every raw span in `document`, in document order
    fn collect_raw_spans<'a>(&self, document: &'a Self::Document, out: &mut Vec<&'a Self::RawSpan>);

    /// Id and parent reference used for tree assembly
    fn span_link<'a>(&self, span: &'a Self::RawSpan) -> SpanLink<'a>;

    /// Normalize one raw span. The result has no children.
    fn convert_raw_span_to_trace_span(&self, span: &Self::RawSpan) -> TraceSpan;

    /// Duration in milliseconds, 0 when the timestamps are missing or invalid
    fn get_span_duration(&self, span: &Self::RawSpan) -> i64;
    fn get_span_cost(&self, span: &Self::RawSpan) -> f64;
    fn get_span_tokens_count(&self, span: &Self::RawSpan) -> f64;
    fn get_span_input_output(&self, span: &Self::RawSpan) -> InputOutputData;
    fn get_span_status(&self, span: &Self::RawSpan) -> SpanStatus;
    fn get_span_category(&self, span: &Self::RawSpan) -> SpanCategory;

    /// Flatten all documents and build one forest from their spans
    fn convert_raw_documents_to_spans(&self, documents: &[Self::Document]) -> Vec<TraceSpan> {
        let mut spans = Vec::new();
        for document in documents {
            self.collect_raw_spans(document, &mut spans);
        }
        tracing::debug!(
            documents = documents.len(),
            spans = spans.len(),
            "Collected raw spans"
        );
        build_span_tree(
            &spans,
            |span| self.span_link(span),
            |span| self.convert_raw_span_to_trace_span(span),
        )
    }

    fn convert_raw_spans_to_span_tree(&self, spans: &[Self::RawSpan]) -> Vec<TraceSpan> {
        let spans: Vec<&Self::RawSpan> = spans.iter().collect();
        build_span_tree(
            &spans,
            |span| self.span_link(span),
            |span| self.convert_raw_span_to_trace_span(span),
        )
    }
}

/// Pretty-printed JSON of a raw record, for the `raw` field
pub(crate) fn raw_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to serialize raw span");
        String::new()
    })
}
