use super::*;
use crate::domain::traces::otel::mock::mock_span;
use serde_json::json;

fn classify(span: &crate::data::types::OpenTelemetrySpan) -> SpanCategory {
    classify_span(&span.name, &span.attributes)
}

// ============================================================================
// HELPERS
// ============================================================================

#[test]
fn test_contains_ascii_ignore_case() {
    assert!(contains_ascii_ignore_case("OpenAI Call", "openai"));
    assert!(contains_ascii_ignore_case("langchain.chain.RetrievalQA", "retrieval"));
    assert!(contains_ascii_ignore_case("anything", ""));
    assert!(!contains_ascii_ignore_case("gp", "gpt"));
    assert!(!contains_ascii_ignore_case("generic operation", "agent"));
}

// ============================================================================
// STANDARD DETECTION
// ============================================================================

#[test]
fn test_detect_gen_ai() {
    let by_operation = mock_span().attr(keys::GEN_AI_OPERATION_NAME, json!("chat")).build();
    let by_system = mock_span().attr(keys::GEN_AI_SYSTEM, json!("openai")).build();
    assert_eq!(detect_standard(&by_operation.attributes), SpanStandard::OpenTelemetryGenAI);
    assert_eq!(detect_standard(&by_system.attributes), SpanStandard::OpenTelemetryGenAI);
}

#[test]
fn test_detect_open_inference() {
    let by_kind = mock_span().attr(keys::OPENINFERENCE_SPAN_KIND, json!("LLM")).build();
    let by_model = mock_span().attr(keys::LLM_MODEL_NAME, json!("gpt-4")).build();
    assert_eq!(detect_standard(&by_kind.attributes), SpanStandard::OpenInference);
    assert_eq!(detect_standard(&by_model.attributes), SpanStandard::OpenInference);
}

#[test]
fn test_detect_gen_ai_wins_over_open_inference() {
    let span = mock_span()
        .attr(keys::OPENINFERENCE_SPAN_KIND, json!("TOOL"))
        .attr(keys::GEN_AI_SYSTEM, json!("anthropic"))
        .build();
    assert_eq!(detect_standard(&span.attributes), SpanStandard::OpenTelemetryGenAI);
}

#[test]
fn test_detect_ignores_falsy_markers() {
    for value in [json!(""), json!(0), json!(false), json!(null)] {
        let span = mock_span()
            .attr(keys::GEN_AI_OPERATION_NAME, value.clone())
            .attr(keys::LLM_MODEL_NAME, value)
            .build();
        assert_eq!(detect_standard(&span.attributes), SpanStandard::Standard);
    }

    let nan = mock_span().int_attr(keys::GEN_AI_SYSTEM, "NaN").build();
    assert_eq!(detect_standard(&nan.attributes), SpanStandard::Standard);
}

#[test]
fn test_detect_accepts_truthy_non_strings() {
    let whitespace = mock_span().attr(keys::GEN_AI_SYSTEM, json!(" ")).build();
    let number = mock_span().attr(keys::GEN_AI_SYSTEM, json!(1)).build();
    let boolean = mock_span().attr(keys::OPENINFERENCE_SPAN_KIND, json!(true)).build();
    assert_eq!(detect_standard(&whitespace.attributes), SpanStandard::OpenTelemetryGenAI);
    assert_eq!(detect_standard(&number.attributes), SpanStandard::OpenTelemetryGenAI);
    assert_eq!(detect_standard(&boolean.attributes), SpanStandard::OpenInference);
}

#[test]
fn test_detect_standard_without_markers() {
    let span = mock_span().attr(keys::HTTP_METHOD, json!("GET")).build();
    assert_eq!(detect_standard(&span.attributes), SpanStandard::Standard);
    assert_eq!(detect_standard(&[]), SpanStandard::Standard);
}

// ============================================================================
// GENAI
// ============================================================================

#[test]
fn test_gen_ai_operations() {
    let cases = [
        ("chat", SpanCategory::LlmCall),
        ("generate_content", SpanCategory::LlmCall),
        ("text_completion", SpanCategory::LlmCall),
        ("execute_tool", SpanCategory::ToolExecution),
        ("invoke_agent", SpanCategory::AgentInvocation),
        ("create_agent", SpanCategory::CreateAgent),
        ("embeddings", SpanCategory::Embedding),
        ("custom_operation", SpanCategory::Unknown),
        ("CHAT", SpanCategory::Unknown),
    ];
    for (operation, expected) in cases {
        let span = mock_span().attr(keys::GEN_AI_OPERATION_NAME, json!(operation)).build();
        assert_eq!(categorize_gen_ai(&span.attributes), expected, "{operation}");
    }
}

#[test]
fn test_gen_ai_non_string_operation_is_unknown() {
    let span = mock_span().attr(keys::GEN_AI_OPERATION_NAME, json!(42)).build();
    assert_eq!(categorize_gen_ai(&span.attributes), SpanCategory::Unknown);
    assert_eq!(categorize_gen_ai(&[]), SpanCategory::Unknown);
}

// ============================================================================
// OPENINFERENCE
// ============================================================================

#[test]
fn test_open_inference_kinds() {
    let cases = [
        ("LLM", SpanCategory::LlmCall),
        ("TOOL", SpanCategory::ToolExecution),
        ("CHAIN", SpanCategory::ChainOperation),
        ("AGENT", SpanCategory::AgentInvocation),
        ("RETRIEVER", SpanCategory::Retrieval),
        ("EMBEDDING", SpanCategory::Embedding),
        ("RERANKER", SpanCategory::Unknown),
        ("llm", SpanCategory::Unknown),
    ];
    for (kind, expected) in cases {
        let span = mock_span().attr(keys::OPENINFERENCE_SPAN_KIND, json!(kind)).build();
        assert_eq!(categorize_open_inference(&span.attributes), expected, "{kind}");
    }
}

// ============================================================================
// HEURISTIC
// ============================================================================

#[test]
fn test_heuristic_name_keywords() {
    let cases = [
        ("openai completion", SpanCategory::LlmCall),
        ("ANTHROPIC Generation", SpanCategory::LlmCall),
        ("claude-3 sonnet", SpanCategory::LlmCall),
        ("openai-like-service", SpanCategory::LlmCall),
        ("Agent Runner", SpanCategory::AgentInvocation),
        ("WORKFLOW Execution", SpanCategory::ChainOperation),
        ("langchain.chain.RetrievalQA.invoke", SpanCategory::ChainOperation),
        ("pinecone.index.query", SpanCategory::Retrieval),
        ("VECTOR Database", SpanCategory::Retrieval),
        ("Function Call", SpanCategory::ToolExecution),
        ("generic operation", SpanCategory::Unknown),
        ("", SpanCategory::Unknown),
    ];
    for (name, expected) in cases {
        assert_eq!(categorize_standard(name, &[]), expected, "{name}");
    }
}

#[test]
fn test_heuristic_priority() {
    let cases = [
        ("openai agent tool function", SpanCategory::LlmCall),
        ("agent chain workflow", SpanCategory::AgentInvocation),
        ("langchain vector search", SpanCategory::ChainOperation),
        ("pinecone function call", SpanCategory::Retrieval),
    ];
    for (name, expected) in cases {
        let span = mock_span()
            .name(name)
            .attr(keys::FUNCTION_NAME, json!("some_function"))
            .build();
        assert_eq!(categorize_standard(&span.name, &span.attributes), expected, "{name}");
    }
}

#[test]
fn test_heuristic_attributes() {
    let function = mock_span()
        .name("calculator.add")
        .attr(keys::FUNCTION_NAME, json!("add"))
        .build();
    let http = mock_span()
        .name("GET /api/users")
        .attr(keys::HTTP_METHOD, json!("GET"))
        .attr(keys::HTTP_URL, json!("/api/users"))
        .build();
    let db = mock_span()
        .name("SELECT users FROM database")
        .attr(keys::DB_SYSTEM, json!("postgresql"))
        .build();
    for span in [function, http, db] {
        assert_eq!(
            categorize_standard(&span.name, &span.attributes),
            SpanCategory::ToolExecution,
            "{}",
            span.name
        );
    }
}

#[test]
fn test_heuristic_attribute_presence_ignores_truthiness() {
    let span = mock_span().name("request").attr(keys::HTTP_METHOD, json!("")).build();
    assert_eq!(
        categorize_standard(&span.name, &span.attributes),
        SpanCategory::ToolExecution
    );

    let unrelated = mock_span()
        .name("custom span")
        .attr("custom.attribute", json!("value"))
        .attr("another.field", json!(123))
        .build();
    assert_eq!(
        categorize_standard(&unrelated.name, &unrelated.attributes),
        SpanCategory::Unknown
    );
}

// ============================================================================
// CASCADE
// ============================================================================

#[test]
fn test_classify_uses_standard_classifier_first() {
    let span = mock_span()
        .name("openai call")
        .attr(keys::GEN_AI_OPERATION_NAME, json!("embeddings"))
        .build();
    assert_eq!(classify(&span), SpanCategory::Embedding);

    let span = mock_span()
        .name("agent step")
        .attr(keys::OPENINFERENCE_SPAN_KIND, json!("RETRIEVER"))
        .build();
    assert_eq!(classify(&span), SpanCategory::Retrieval);
}

#[test]
fn test_classify_falls_back_to_heuristic() {
    let gen_ai = mock_span()
        .name("anthropic request")
        .attr(keys::GEN_AI_OPERATION_NAME, json!("custom_operation"))
        .build();
    assert_eq!(classify(&gen_ai), SpanCategory::LlmCall);

    let open_inference = mock_span()
        .name("lookup")
        .attr(keys::LLM_MODEL_NAME, json!("gpt-4"))
        .attr(keys::DB_SYSTEM, json!("redis"))
        .build();
    assert_eq!(classify(&open_inference), SpanCategory::ToolExecution);

    let nothing = mock_span().name("step").build();
    assert_eq!(classify(&nothing), SpanCategory::Unknown);
}

#[test]
fn test_classify_does_not_cross_standards() {
    // GenAI detected, so the OpenInference kind is never consulted
    let span = mock_span()
        .name("step")
        .attr(keys::GEN_AI_SYSTEM, json!("openai"))
        .attr(keys::OPENINFERENCE_SPAN_KIND, json!("TOOL"))
        .build();
    assert_eq!(classify(&span), SpanCategory::Unknown);
}

#[test]
fn test_classify_is_idempotent() {
    let span = mock_span()
        .name("langchain vector search")
        .attr(keys::GEN_AI_OPERATION_NAME, json!("invoke_agent"))
        .build();
    assert_eq!(classify(&span), classify(&span));
    assert_eq!(classify(&span), SpanCategory::AgentInvocation);
}
