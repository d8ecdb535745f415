//! Integration tests for the cloud provider against a mock HTTP server

use quill_core::{Capability, GenerationConfig, LlmError, NoopSink};
use quill_llm::{ensure_capability, ComposedPrompt, LlmProvider, OpenAiProvider};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> GenerationConfig {
    GenerationConfig {
        model: "gpt-4o-mini".into(),
        system_prompt: "You are concise.".into(),
        temperature: 1.0,
        max_length: 2048,
        top_p: 1.0,
        top_k: 40,
        repeat_penalty: 0.0,
        context_window: 4096,
    }
}

fn provider_for(server: &MockServer) -> OpenAiProvider {
    OpenAiProvider::new(reqwest::Client::new(), "sk-test".into(), server.uri(), 30)
}

fn chat_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1714550000,
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ],
        "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 }
    })
}

#[tokio::test]
async fn generate_parses_single_document_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("A short answer.")))
        .mount(&server)
        .await;

    let prompt = ComposedPrompt {
        system: Some("You are concise.".into()),
        user: "TEXT:\n\"\"\"\nhello\n\"\"\"\n\nTASK: summarize".into(),
    };
    let answer = provider_for(&server)
        .generate(&prompt, &test_config(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(answer, "A short answer.");
}

#[tokio::test]
async fn wrapped_quotes_are_stripped_from_the_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("\"quoted answer\"")))
        .mount(&server)
        .await;

    let prompt = ComposedPrompt {
        system: None,
        user: "body".into(),
    };
    let answer = provider_for(&server)
        .generate(&prompt, &test_config(), CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(answer, "quoted answer");
}

#[tokio::test]
async fn auth_failure_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_api_key"}"#),
        )
        .mount(&server)
        .await;

    let prompt = ComposedPrompt {
        system: None,
        user: "body".into(),
    };
    let err = provider_for(&server)
        .generate(&prompt, &test_config(), CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        LlmError::Provider { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_api_key"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_models_parses_data_array() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "object": "list",
        "data": [
            { "id": "gpt-4o-mini", "object": "model", "created": 1714000000, "owned_by": "openai" },
            { "id": "gpt-4o", "object": "model", "created": 1713000000, "owned_by": "openai" }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let models = provider_for(&server).list_models().await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name, "gpt-4o-mini");
    assert_eq!(models[0].owned_by.as_deref(), Some("openai"));
}

#[tokio::test]
async fn model_pulling_is_unsupported_on_the_cloud_provider() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);

    // the capability check fails fast
    let err = ensure_capability(&provider, Capability::ModelPulling).unwrap_err();
    assert!(matches!(err, LlmError::UnsupportedCapability { .. }));

    // and so does the call itself, with the same distinct error
    let err = provider
        .pull_model("any", &NoopSink, CancellationToken::new())
        .await
        .unwrap_err();
    match err {
        LlmError::UnsupportedCapability {
            provider,
            capability,
        } => {
            assert_eq!(provider, "OpenAI");
            assert_eq!(capability, Capability::ModelPulling);
        }
        other => panic!("expected unsupported capability, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_before_send_returns_empty_accumulation() {
    let server = MockServer::start().await;
    // no mock mounted: a request reaching the server would 404 and error
    let cancel = CancellationToken::new();
    cancel.cancel();

    let prompt = ComposedPrompt {
        system: None,
        user: "body".into(),
    };
    let answer = provider_for(&server)
        .generate(&prompt, &test_config(), cancel)
        .await
        .unwrap();
    assert_eq!(answer, "");
}
