//! Shared data types for both input formats
//!
//! Raw document types mirror each format's wire shape; the normalized
//! `TraceSpan` model is what every adapter produces.

mod enums;
mod langfuse;
mod otel;
mod span;

// Re-export enum types
pub use enums::{ObservationLevel, ObservationType, SpanCategory, SpanStandard, SpanStatus};

// Re-export normalized types
pub use span::{ArrayValue, InputOutputData, TraceSpan, TraceSpanAttribute, TraceSpanAttributeValue};

// Re-export raw OpenTelemetry types
pub use otel::{
    OpenTelemetryDocument, OpenTelemetryEvent, OpenTelemetryLink, OpenTelemetryResource,
    OpenTelemetryResourceSpan, OpenTelemetryScope, OpenTelemetryScopeSpan, OpenTelemetrySpan,
    OpenTelemetryStatus,
};

// Re-export raw Langfuse types
pub use langfuse::{LangfuseDetails, LangfuseDocument, LangfuseObservation, LangfuseTrace};
