//! Chat-completions provider against a mock HTTP server.

use std::sync::Arc;

use hitl_agent::agent::AgentStep;
use hitl_agent::agent_loop::InterruptController;
use hitl_agent::checkpoint::MemoryCheckpointStore;
use hitl_agent::config::HitlConfig;
use hitl_agent::error::HitlError;
use hitl_agent::models::{ModelSpec, ProviderKey};
use hitl_agent::provider::{
    create_provider, ModelProvider, OpenAiCompatibleProvider, ProviderRequest,
};
use hitl_agent::tools::ToolRegistry;
use hitl_agent::types::{FinishReason, GenerationSettings, ModelMessage};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(messages: Vec<ModelMessage>) -> ProviderRequest {
    ProviderRequest {
        messages,
        settings: GenerationSettings::default(),
        tools: ToolRegistry::stock().definitions(),
    }
}

fn text_completion(text: &str) -> serde_json::Value {
    json!({
        "choices": [{
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
    })
}

fn buy_completion() -> serde_json::Value {
    json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_abc",
                    "type": "function",
                    "function": {
                        "name": "buy_stocks",
                        "arguments": "{\"symbol\":\"MSFT\",\"quantity\":10,\"total_price\":2003.0}"
                    }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    })
}

#[tokio::test]
async fn text_response_is_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({"model": "llama-3.3-70b-versatile"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_completion("Hello!")))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        OpenAiCompatibleProvider::new("groq", "llama-3.3-70b-versatile", "test-key", server.uri());
    let response = provider
        .generate_text(&request(vec![ModelMessage::user("Hi")]))
        .await
        .expect("completion should succeed");

    assert_eq!(response.text, "Hello!");
    assert!(response.tool_calls.is_empty());
    assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    assert_eq!(response.usage.total_tokens, 19);
}

#[tokio::test]
async fn tool_calls_are_decoded_and_tools_advertised() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"get_stock_price\""))
        .and(body_string_contains("\"buy_stocks\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(buy_completion()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("groq", "m", "k", server.uri());
    let response = provider
        .generate_text(&request(vec![ModelMessage::user("Buy 10 MSFT")]))
        .await
        .unwrap();

    assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
    assert_eq!(response.tool_calls.len(), 1);
    let call = &response.tool_calls[0];
    assert_eq!(call.id, "call_abc");
    assert_eq!(call.name, "buy_stocks");
    assert_eq!(call.arguments["quantity"], 10);
}

#[tokio::test]
async fn error_statuses_map_to_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("groq", "m", "bad", server.uri());
    let err = provider
        .generate_text(&request(vec![ModelMessage::user("Hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, HitlError::Authentication(ref msg) if msg.contains("invalid api key")));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new("groq", "m", "k", server.uri());
    let err = provider
        .generate_text(&request(vec![ModelMessage::user("Hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, HitlError::Api { status: 503, .. }));
}

#[tokio::test]
async fn create_provider_uses_configured_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer cfg-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let config = HitlConfig::new();
    config.set_api_key(ProviderKey::Groq, "cfg-key".into());
    config.set_base_url(ProviderKey::Groq, server.uri());
    let spec: ModelSpec = "groq:llama-3.3-70b-versatile".parse().unwrap();

    let provider = create_provider(&spec, &config).unwrap();
    assert_eq!(provider.provider_name(), "groq");
    let response = provider
        .generate_text(&request(vec![ModelMessage::user("Hi")]))
        .await
        .unwrap();
    assert_eq!(response.text, "ok");
}

#[test]
fn create_provider_requires_api_key() {
    let spec: ModelSpec = "groq:llama-3.3-70b-versatile".parse().unwrap();
    let err = match create_provider(&spec, &HitlConfig::new()) {
        Ok(_) => panic!("expected missing key error"),
        Err(err) => err,
    };
    assert!(matches!(err, HitlError::Authentication(ref msg) if msg.contains("GROQ_API_KEY")));
}

#[tokio::test]
async fn full_cycle_over_http_sends_tool_result_back() {
    let server = MockServer::start().await;
    // After the tool result is in the history, answer with text.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"tool_call_id\":\"call_abc\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_completion("Purchase complete.")))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(buy_completion()))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let provider = Arc::new(OpenAiCompatibleProvider::new("groq", "m", "k", server.uri()));
    let controller = InterruptController::new(
        AgentStep::new(provider, ToolRegistry::stock()),
        Arc::new(MemoryCheckpointStore::new()),
    );

    let outcome = controller
        .send("buy_thread", "Buy 10 MSFT stocks at current price.")
        .await
        .unwrap();
    assert_eq!(
        outcome.pending().unwrap().prompt_text,
        "Approve buying 10 MSFT stocks for $2003.00?"
    );

    let outcome = controller.resume("buy_thread", "yes").await.unwrap();
    assert_eq!(outcome.final_message().unwrap().text(), "Purchase complete.");
}
