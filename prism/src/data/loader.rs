//! Raw trace document loading
//!
//! Accepts OTLP/JSON, OTLP protobuf and Langfuse exports. A JSON input may be
//! a single document or an array of documents of the same kind.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::types::{LangfuseDocument, OpenTelemetryDocument, TraceSpan};
use crate::domain::traces::{LangfuseSpanAdapter, OpenTelemetrySpanAdapter, SpanAdapter};
use crate::utils::{file, otlp};

const RESOURCE_SPANS_KEY: &str = "resourceSpans";
const OBSERVATIONS_KEY: &str = "observations";

/// Requested input format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Detect from content
    #[default]
    Auto,
    /// OTLP/JSON
    Otel,
    /// OTLP protobuf (`ExportTraceServiceRequest`)
    Otlp,
    /// Langfuse `{ trace, observations }` export
    Langfuse,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Otel => "otel",
            Self::Otlp => "otlp",
            Self::Langfuse => "langfuse",
        }
    }
}

/// Document family detected in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    OpenTelemetry,
    Langfuse,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenTelemetry => "opentelemetry",
            Self::Langfuse => "langfuse",
        }
    }

    fn of(value: &JsonValue) -> Option<Self> {
        let object = value.as_object()?;
        if object.contains_key(RESOURCE_SPANS_KEY) {
            Some(Self::OpenTelemetry)
        } else if object.contains_key(OBSERVATIONS_KEY) {
            Some(Self::Langfuse)
        } else {
            None
        }
    }
}

/// Loaded documents, all of one kind
#[derive(Debug, Clone, PartialEq)]
pub enum TraceDocuments {
    OpenTelemetry(Vec<OpenTelemetryDocument>),
    Langfuse(Vec<LangfuseDocument>),
}

impl TraceDocuments {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::OpenTelemetry(_) => DocumentKind::OpenTelemetry,
            Self::Langfuse(_) => DocumentKind::Langfuse,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::OpenTelemetry(docs) => docs.len(),
            Self::Langfuse(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Normalize with the matching adapter into one span forest
    pub fn to_span_tree(&self) -> Vec<TraceSpan> {
        match self {
            Self::OpenTelemetry(docs) => OpenTelemetrySpanAdapter.convert_raw_documents_to_spans(docs),
            Self::Langfuse(docs) => LangfuseSpanAdapter.convert_raw_documents_to_spans(docs),
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load documents from a file path, `-` for standard input
pub fn load_documents_from_path(path: &str, format: InputFormat) -> Result<TraceDocuments, DataError> {
    let bytes = file::read_input(path)?;
    tracing::debug!(
        path = %Path::new(path).display(),
        bytes = bytes.len(),
        format = format.as_str(),
        "Read trace input"
    );
    load_documents(&bytes, format)
}

/// Parse raw bytes into trace documents.
///
/// `Auto` treats input whose first non-whitespace byte is `{` or `[` as JSON
/// and anything else as OTLP protobuf.
pub fn load_documents(bytes: &[u8], format: InputFormat) -> Result<TraceDocuments, DataError> {
    match format {
        InputFormat::Otlp => decode_protobuf(bytes),
        InputFormat::Auto if !looks_like_json(bytes) => decode_protobuf(bytes),
        InputFormat::Auto => load_json(bytes, None),
        InputFormat::Otel => load_json(bytes, Some(DocumentKind::OpenTelemetry)),
        InputFormat::Langfuse => load_json(bytes, Some(DocumentKind::Langfuse)),
    }
}

fn looks_like_json(bytes: &[u8]) -> bool {
    matches!(
        bytes.iter().find(|b| !b.is_ascii_whitespace()),
        Some(b'{' | b'[')
    )
}

fn decode_protobuf(bytes: &[u8]) -> Result<TraceDocuments, DataError> {
    let request = otlp::decode_trace_request(bytes)?;
    Ok(TraceDocuments::OpenTelemetry(vec![
        otlp::export_request_to_document(&request),
    ]))
}

fn load_json(bytes: &[u8], expected: Option<DocumentKind>) -> Result<TraceDocuments, DataError> {
    let value: JsonValue = serde_json::from_slice(bytes)?;
    let values = match value {
        JsonValue::Array(items) => items,
        other => vec![other],
    };

    let kind = detect_kind(&values, expected)?;
    if let Some(expected) = expected {
        if expected != kind {
            return Err(DataError::format_mismatch(expected.as_str(), kind.as_str()));
        }
    }

    match kind {
        DocumentKind::OpenTelemetry => Ok(TraceDocuments::OpenTelemetry(parse_all(values)?)),
        DocumentKind::Langfuse => Ok(TraceDocuments::Langfuse(parse_all(values)?)),
    }
}

/// Every document must agree. Documents of neither shape follow `expected`.
fn detect_kind(values: &[JsonValue], expected: Option<DocumentKind>) -> Result<DocumentKind, DataError> {
    let mut detected: Option<DocumentKind> = None;

    for (i, value) in values.iter().enumerate() {
        if !value.is_object() {
            return Err(DataError::UnknownFormat(format!(
                "document {i} is not a JSON object"
            )));
        }
        match (DocumentKind::of(value), detected) {
            (Some(kind), Some(previous)) if kind != previous => {
                return Err(DataError::UnknownFormat(format!(
                    "document {i} is {}, earlier documents are {}",
                    kind.as_str(),
                    previous.as_str()
                )));
            }
            (Some(kind), _) => detected = Some(kind),
            (None, _) if expected.is_none() => {
                return Err(DataError::UnknownFormat(format!(
                    "document {i} has neither `{RESOURCE_SPANS_KEY}` nor `{OBSERVATIONS_KEY}`"
                )));
            }
            (None, _) => {}
        }
    }

    detected
        .or(expected)
        .ok_or_else(|| DataError::UnknownFormat("no documents".to_string()))
}

fn parse_all<T: serde::de::DeserializeOwned>(values: Vec<JsonValue>) -> Result<Vec<T>, DataError> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(DataError::from))
        .collect()
}
