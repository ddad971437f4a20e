//! Domain logic over normalized traces

pub mod timeline;
pub mod traces;

pub use timeline::{TimeRange, TimelineData, TraceSummary};
pub use traces::{LangfuseSpanAdapter, OpenTelemetrySpanAdapter, SpanAdapter};
