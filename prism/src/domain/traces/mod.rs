//! Trace normalization: adapters, classification and tree assembly

pub mod adapter;
pub mod langfuse;
pub mod otel;
pub mod tree;

pub use adapter::SpanAdapter;
pub use langfuse::LangfuseSpanAdapter;
pub use otel::OpenTelemetrySpanAdapter;
pub use tree::{SpanLink, build_span_tree};
