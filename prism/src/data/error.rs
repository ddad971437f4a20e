//! Error type for the document-loading boundary
//!
//! Normalization itself never fails; only reading and decoding raw documents
//! can.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// Input is not valid JSON, or JSON of the wrong shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input is neither JSON nor a decodable OTLP protobuf export
    #[error("OTLP protobuf decode error: {0}")]
    Protobuf(#[from] prost::DecodeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON that matches neither an OpenTelemetry nor a Langfuse document
    #[error("Unrecognized trace document: {0}")]
    UnknownFormat(String),

    /// An explicit `--format` disagrees with what the document contains
    #[error("Expected a {expected} document, found {found}")]
    FormatMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl DataError {
    /// Create a format mismatch error
    pub fn format_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::FormatMismatch { expected, found }
    }

    /// Whether the error came from the input's content rather than reading it
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
