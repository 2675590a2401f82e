//! Shared test helpers: a scripted provider and scripted human input.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hitl_agent::agent::AgentStep;
use hitl_agent::agent_loop::InterruptController;
use hitl_agent::checkpoint::MemoryCheckpointStore;
use hitl_agent::driver::HumanInput;
use hitl_agent::error::HitlError;
use hitl_agent::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use hitl_agent::tools::ToolRegistry;
use hitl_agent::types::*;

enum Scripted {
    Reply(Result<ProviderResponse, HitlError>),
    Hang,
}

/// A mock provider that returns canned responses in order.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a final text response.
    pub fn queue_response(&self, text: &str) {
        self.push(Ok(ProviderResponse {
            text: text.to_string(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a response requesting one tool call.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) {
        self.queue_tool_calls(vec![(id, name, args)]);
    }

    /// Queue a response requesting several tool calls in order.
    pub fn queue_tool_calls(&self, calls: Vec<(&str, &str, serde_json::Value)>) {
        let tool_calls = calls
            .into_iter()
            .map(|(id, name, arguments)| AgentToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments,
            })
            .collect();
        self.push(Ok(ProviderResponse {
            text: String::new(),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            tool_calls,
            finish_reason: Some(FinishReason::ToolCalls),
        }));
    }

    /// Queue a provider failure.
    pub fn queue_error(&self, error: HitlError) {
        self.push(Err(error));
    }

    /// Queue a call that never returns.
    pub fn queue_hang(&self) {
        self.responses.lock().unwrap().push_back(Scripted::Hang);
    }

    fn push(&self, reply: Result<ProviderResponse, HitlError>) {
        self.responses.lock().unwrap().push_back(Scripted::Reply(reply));
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, HitlError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Hang) => std::future::pending().await,
            None => Ok(ProviderResponse {
                text: "Mock response".to_string(),
                finish_reason: Some(FinishReason::Stop),
                ..Default::default()
            }),
        }
    }
}

/// Human input that answers from a fixed script and records the prompts.
#[derive(Default)]
pub struct ScriptedInput {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl HumanInput for ScriptedInput {
    async fn ask(&self, prompt: &str) -> Result<String, HitlError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HitlError::InvalidState("script ran out of answers".into()))
    }
}

/// Controller over the stock tools and a fresh in-memory store.
pub fn stock_controller(provider: Arc<MockProvider>) -> InterruptController {
    let step = AgentStep::new(provider, ToolRegistry::stock());
    InterruptController::new(step, Arc::new(MemoryCheckpointStore::new()))
}

/// Arguments for the canonical `buy_stocks` call.
pub fn buy_msft_args() -> serde_json::Value {
    serde_json::json!({"symbol": "MSFT", "quantity": 10, "total_price": 2003.0})
}
