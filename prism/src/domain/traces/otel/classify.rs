//! Span standard detection and category classification.
//!
//! Classification is a two-level cascade: the classifier for the detected
//! standard runs first, and the name/attribute heuristic runs only when it
//! yields `Unknown`. The GenAI and OpenInference classifiers never both run
//! for one span.

use crate::data::types::{SpanCategory, SpanStandard, TraceSpanAttribute};

use super::attributes::{get_string_attribute, has_attribute, has_truthy_attribute};
use super::keys;

// ============================================================================
// SHARED HELPER FUNCTIONS
// ============================================================================

/// Check if haystack contains needle (case-insensitive, ASCII only).
#[inline]
fn contains_ascii_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.len() < needle.len() {
        return false;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

// ============================================================================
// STANDARD DETECTION
// ============================================================================

/// Decide which attribute convention a span follows.
///
/// Presence is truthiness: an empty string, `0` or `false` does not mark a
/// span as GenAI or OpenInference.
pub fn detect_standard(attributes: &[TraceSpanAttribute]) -> SpanStandard {
    if has_truthy_attribute(attributes, keys::GEN_AI_OPERATION_NAME)
        || has_truthy_attribute(attributes, keys::GEN_AI_SYSTEM)
    {
        return SpanStandard::OpenTelemetryGenAI;
    }

    if has_truthy_attribute(attributes, keys::OPENINFERENCE_SPAN_KIND)
        || has_truthy_attribute(attributes, keys::LLM_MODEL_NAME)
    {
        return SpanStandard::OpenInference;
    }

    SpanStandard::Standard
}

// ============================================================================
// STANDARD-SPECIFIC CLASSIFIERS
// ============================================================================

/// Classify by `gen_ai.operation.name` (exact, case-sensitive)
pub fn categorize_gen_ai(attributes: &[TraceSpanAttribute]) -> SpanCategory {
    let Some(operation) = get_string_attribute(attributes, keys::GEN_AI_OPERATION_NAME) else {
        return SpanCategory::Unknown;
    };

    match operation.as_ref() {
        "chat" | "generate_content" | "text_completion" => SpanCategory::LlmCall,
        "execute_tool" => SpanCategory::ToolExecution,
        "invoke_agent" => SpanCategory::AgentInvocation,
        "create_agent" => SpanCategory::CreateAgent,
        "embeddings" => SpanCategory::Embedding,
        _ => SpanCategory::Unknown,
    }
}

/// Classify by `openinference.span.kind` (exact, case-sensitive)
pub fn categorize_open_inference(attributes: &[TraceSpanAttribute]) -> SpanCategory {
    let Some(kind) = get_string_attribute(attributes, keys::OPENINFERENCE_SPAN_KIND) else {
        return SpanCategory::Unknown;
    };

    match kind.as_ref() {
        "LLM" => SpanCategory::LlmCall,
        "TOOL" => SpanCategory::ToolExecution,
        "CHAIN" => SpanCategory::ChainOperation,
        "AGENT" => SpanCategory::AgentInvocation,
        "RETRIEVER" => SpanCategory::Retrieval,
        "EMBEDDING" => SpanCategory::Embedding,
        _ => SpanCategory::Unknown,
    }
}

// ============================================================================
// HEURISTIC CLASSIFIER
// ============================================================================

/// Heuristic rule for declarative matching
struct HeuristicRule {
    category: SpanCategory,
    /// Match if the span name contains any of these (ASCII case-insensitive)
    name_contains: &'static [&'static str],
    /// Match if any of these attributes is present with any value
    attr_exists: &'static [&'static str],
}

/// Default rule for struct update syntax in const context
const DEFAULT_RULE: HeuristicRule = HeuristicRule {
    category: SpanCategory::Unknown,
    name_contains: &[],
    attr_exists: &[],
};

/// Macro to create HeuristicRule with defaults for unspecified fields
macro_rules! rule {
    ($category:expr $(, $field:ident : $value:expr)* $(,)?) => {
        HeuristicRule {
            category: $category,
            $($field: $value,)*
            ..DEFAULT_RULE
        }
    };
}

impl HeuristicRule {
    fn matches(&self, name: &str, attributes: &[TraceSpanAttribute]) -> bool {
        self.name_contains
            .iter()
            .any(|keyword| contains_ascii_ignore_case(name, keyword))
            || self
                .attr_exists
                .iter()
                .any(|key| has_attribute(attributes, key))
    }
}

/// Heuristic rules in priority order (first match wins)
const HEURISTIC_RULES: &[HeuristicRule] = &[
    rule!(SpanCategory::LlmCall,
        name_contains: &["openai", "anthropic", "gpt", "claude"],
    ),
    rule!(SpanCategory::AgentInvocation,
        name_contains: &["agent"],
    ),
    rule!(SpanCategory::ChainOperation,
        name_contains: &["chain", "workflow", "langchain"],
    ),
    rule!(SpanCategory::Retrieval,
        name_contains: &["pinecone", "chroma", "retrieval", "vector", "search"],
    ),
    // Function call
    rule!(SpanCategory::ToolExecution,
        name_contains: &["tool", "function"],
        attr_exists: &[keys::FUNCTION_NAME],
    ),
    // HTTP call
    rule!(SpanCategory::ToolExecution,
        attr_exists: &[keys::HTTP_METHOD],
    ),
    // Database call
    rule!(SpanCategory::ToolExecution,
        attr_exists: &[keys::DB_SYSTEM],
    ),
];

/// Classify from the span name and generic attributes
pub fn categorize_standard(name: &str, attributes: &[TraceSpanAttribute]) -> SpanCategory {
    HEURISTIC_RULES
        .iter()
        .find(|rule| rule.matches(name, attributes))
        .map_or(SpanCategory::Unknown, |rule| rule.category)
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Classify a span. Always returns a category.
pub fn classify_span(name: &str, attributes: &[TraceSpanAttribute]) -> SpanCategory {
    let standard = detect_standard(attributes);

    let specific = match standard {
        SpanStandard::OpenTelemetryGenAI => categorize_gen_ai(attributes),
        SpanStandard::OpenInference => categorize_open_inference(attributes),
        SpanStandard::Standard => SpanCategory::Unknown,
    };

    let category = if specific == SpanCategory::Unknown {
        categorize_standard(name, attributes)
    } else {
        specific
    };

    tracing::trace!(
        name,
        standard = standard.as_str(),
        category = category.as_str(),
        "Classified span"
    );
    category
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
