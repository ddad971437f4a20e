//! Timeline positions and trace-level aggregates over normalized spans
//!
//! All times here are milliseconds since the Unix epoch as `f64`, so an empty
//! range can be expressed as `+inf..-inf`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::data::types::{SpanCategory, TraceSpan};

const MS_PER_SECOND: f64 = 1_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

// ============================================================================
// TIME RANGE
// ============================================================================

/// Earliest start and latest end of a set of spans
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub min_start: f64,
    pub max_end: f64,
}

impl TimeRange {
    /// No spans: `min_start` is `+inf`, `max_end` is `-inf`
    pub const EMPTY: Self = Self {
        min_start: f64::INFINITY,
        max_end: f64::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.min_start > self.max_end
    }

    pub fn width(&self) -> f64 {
        self.max_end - self.min_start
    }
}

fn millis(time: &DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Range covering every span in `spans` (children are not visited)
pub fn find_time_range<'a>(spans: impl IntoIterator<Item = &'a TraceSpan>) -> TimeRange {
    spans.into_iter().fold(TimeRange::EMPTY, |range, span| TimeRange {
        min_start: range.min_start.min(millis(&span.start_time)),
        max_end: range.max_end.max(millis(&span.end_time)),
    })
}

/// `end_time - start_time` in milliseconds, negative when inverted
pub fn get_duration_ms(span: &TraceSpan) -> f64 {
    millis(&span.end_time) - millis(&span.start_time)
}

// ============================================================================
// TIMELINE
// ============================================================================

/// Position of one span inside a time range, in percent of the range width
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineData {
    pub duration_ms: f64,
    pub start_percent: f64,
    pub width_percent: f64,
}

/// A zero-width range is not guarded and yields `NaN` or infinite percentages.
pub fn get_timeline_data(span: &TraceSpan, range: &TimeRange) -> TimelineData {
    let total = range.width();
    let duration_ms = get_duration_ms(span);
    TimelineData {
        duration_ms,
        start_percent: (millis(&span.start_time) - range.min_start) / total * 100.0,
        width_percent: duration_ms / total * 100.0,
    }
}

/// One row of a rendered timeline
#[derive(Debug, Clone, Copy)]
pub struct TimelineRow<'a> {
    pub depth: usize,
    pub span: &'a TraceSpan,
    pub timeline: TimelineData,
}

/// Pre-order rows for a span forest, positioned against the whole forest's range
pub fn build_timeline(roots: &[TraceSpan]) -> Vec<TimelineRow<'_>> {
    let spans = flatten_with_depth(roots);
    let range = find_time_range(spans.iter().map(|&(_, span)| span));
    spans
        .into_iter()
        .map(|(depth, span)| TimelineRow {
            depth,
            span,
            timeline: get_timeline_data(span, &range),
        })
        .collect()
}

// ============================================================================
// TRAVERSAL
// ============================================================================

fn flatten_with_depth(roots: &[TraceSpan]) -> Vec<(usize, &TraceSpan)> {
    let mut out = Vec::new();
    let mut stack: Vec<(usize, &TraceSpan)> = roots.iter().rev().map(|s| (0, s)).collect();
    while let Some((depth, span)) = stack.pop() {
        out.push((depth, span));
        stack.extend(span.children.iter().rev().map(|c| (depth + 1, c)));
    }
    out
}

/// Depth-first pre-order: every parent precedes its children
pub fn flatten_spans(roots: &[TraceSpan]) -> Vec<&TraceSpan> {
    flatten_with_depth(roots)
        .into_iter()
        .map(|(_, span)| span)
        .collect()
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Round half up, matching how durations are shown in trace viewers
fn round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Compact duration label: `850ms`, `12s`, `3m 5s`, `2h 15m`
pub fn format_duration(duration_ms: f64) -> String {
    if duration_ms < MS_PER_SECOND {
        return format!("{}ms", round(duration_ms));
    }
    if duration_ms < MS_PER_MINUTE {
        return format!("{}s", round(duration_ms / MS_PER_SECOND));
    }
    if duration_ms < MS_PER_HOUR {
        let minutes = (duration_ms / MS_PER_MINUTE).floor();
        let seconds = ((duration_ms % MS_PER_MINUTE) / MS_PER_SECOND).floor();
        return if seconds > 0.0 {
            format!("{minutes}m {seconds}s")
        } else {
            format!("{minutes}m")
        };
    }
    let hours = (duration_ms / MS_PER_HOUR).floor();
    let minutes = ((duration_ms % MS_PER_HOUR) / MS_PER_MINUTE).floor();
    if minutes > 0.0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{hours}h")
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: SpanCategory,
    pub count: usize,
}

/// Aggregate view of a whole trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSummary {
    pub spans_count: usize,
    pub duration_ms: f64,
    pub total_cost: f64,
    pub total_tokens: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Non-zero counts, in category enumeration order
    pub categories: Vec<CategoryCount>,
}

pub fn summarize_trace(roots: &[TraceSpan]) -> TraceSummary {
    let spans = flatten_spans(roots);
    let range = find_time_range(spans.iter().copied());

    let categories = SpanCategory::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            count: spans.iter().filter(|s| s.category == category).count(),
        })
        .filter(|c| c.count > 0)
        .collect();

    TraceSummary {
        spans_count: spans.len(),
        duration_ms: if range.is_empty() { 0.0 } else { range.width() },
        total_cost: spans.iter().map(|s| s.cost).sum(),
        total_tokens: spans.iter().map(|s| s.tokens_count).sum(),
        start_time: spans.iter().map(|s| s.start_time).min(),
        categories,
    }
}
