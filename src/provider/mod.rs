//! Model provider trait and the chat-completions implementation.

pub mod http;
pub mod openai_compatible;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::HitlConfig;
use crate::error::HitlError;
use crate::models::ModelSpec;
use crate::types::{AgentToolCall, FinishReason, GenerationSettings, ModelMessage, Usage};

pub use openai_compatible::OpenAiCompatibleProvider;

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    pub tools: Vec<ToolDefinition>,
}

/// Tool definition sent to the provider API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Response from a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<AgentToolCall>,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "groq").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate the next assistant message, possibly with tool calls.
    async fn generate_text(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, HitlError>;
}

/// Create a provider for the given model, using the provided config.
pub fn create_provider(
    model: &ModelSpec,
    config: &HitlConfig,
) -> Result<Arc<dyn ModelProvider>, HitlError> {
    let provider = model.provider;
    let api_key = config.get_api_key(provider).ok_or_else(|| {
        HitlError::Authentication(format!("Missing {}", provider.api_key_env()))
    })?;
    let base_url = config.get_base_url(provider).ok_or_else(|| {
        HitlError::Configuration(format!(
            "{} requires {}",
            provider,
            provider.base_url_env()
        ))
    })?;
    Ok(Arc::new(OpenAiCompatibleProvider::new(
        provider.as_str(),
        model.model_id.clone(),
        api_key,
        base_url,
    )))
}
