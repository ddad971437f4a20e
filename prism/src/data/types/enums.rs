//! Classification enums for normalized spans
//!
//! These enums are shared by every adapter so that spans coming from
//! different instrumentation standards land in one closed vocabulary.

use serde::{Deserialize, Serialize};

// ============================================================================
// CLASSIFICATION ENUMS
// ============================================================================

/// Semantic category assigned to every normalized span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpanCategory {
    LlmCall,
    ToolExecution,
    AgentInvocation,
    ChainOperation,
    Retrieval,
    Embedding,
    CreateAgent,
    Span,
    Event,
    Guardrail,
    #[default]
    Unknown,
}

impl SpanCategory {
    /// Every category, in declaration order
    pub const ALL: [SpanCategory; 11] = [
        Self::LlmCall,
        Self::ToolExecution,
        Self::AgentInvocation,
        Self::ChainOperation,
        Self::Retrieval,
        Self::Embedding,
        Self::CreateAgent,
        Self::Span,
        Self::Event,
        Self::Guardrail,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LlmCall => "llm_call",
            Self::ToolExecution => "tool_execution",
            Self::AgentInvocation => "agent_invocation",
            Self::ChainOperation => "chain_operation",
            Self::Retrieval => "retrieval",
            Self::Embedding => "embedding",
            Self::CreateAgent => "create_agent",
            Self::Span => "span",
            Self::Event => "event",
            Self::Guardrail => "guardrail",
            Self::Unknown => "unknown",
        }
    }
}

/// Outcome of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpanStatus {
    #[default]
    Success,
    Error,
    Pending,
    Warning,
}

impl SpanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Pending => "pending",
            Self::Warning => "warning",
        }
    }
}

/// Attribute convention an OpenTelemetry span follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpanStandard {
    /// OpenTelemetry GenAI semantic conventions (`gen_ai.*`)
    #[serde(rename = "opentelemetry_genai")]
    OpenTelemetryGenAI,
    /// OpenInference conventions (`openinference.span.kind`, `llm.*`)
    #[serde(rename = "openinference")]
    OpenInference,
    /// No AI-specific annotations
    #[default]
    #[serde(rename = "standard")]
    Standard,
}

impl SpanStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenTelemetryGenAI => "opentelemetry_genai",
            Self::OpenInference => "openinference",
            Self::Standard => "standard",
        }
    }
}

// ============================================================================
// LANGFUSE ENUMS
// ============================================================================

/// Langfuse observation `type` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationType {
    Span,
    Tool,
    Generation,
    Event,
    Agent,
    Chain,
    Retriever,
    Evaluator,
    Embedding,
    Guardrail,
    Unknown,
}

impl ObservationType {
    /// Exact (case-sensitive) match on the wire value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SPAN" => Some(Self::Span),
            "TOOL" => Some(Self::Tool),
            "GENERATION" => Some(Self::Generation),
            "EVENT" => Some(Self::Event),
            "AGENT" => Some(Self::Agent),
            "CHAIN" => Some(Self::Chain),
            "RETRIEVER" => Some(Self::Retriever),
            "EVALUATOR" => Some(Self::Evaluator),
            "EMBEDDING" => Some(Self::Embedding),
            "GUARDRAIL" => Some(Self::Guardrail),
            "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn to_category(self) -> SpanCategory {
        match self {
            Self::Span => SpanCategory::Span,
            Self::Tool => SpanCategory::ToolExecution,
            Self::Generation => SpanCategory::LlmCall,
            Self::Event => SpanCategory::Event,
            Self::Agent => SpanCategory::AgentInvocation,
            Self::Chain => SpanCategory::ChainOperation,
            Self::Retriever => SpanCategory::Retrieval,
            Self::Embedding => SpanCategory::Embedding,
            Self::Guardrail => SpanCategory::Guardrail,
            Self::Evaluator | Self::Unknown => SpanCategory::Unknown,
        }
    }
}

/// Langfuse observation `level` values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationLevel {
    Debug,
    Default,
    Warning,
    Error,
}

impl ObservationLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DEBUG" => Some(Self::Debug),
            "DEFAULT" => Some(Self::Default),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn to_status(self) -> SpanStatus {
        match self {
            Self::Error => SpanStatus::Error,
            Self::Warning => SpanStatus::Warning,
            Self::Debug | Self::Default => SpanStatus::Success,
        }
    }
}
