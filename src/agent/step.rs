//! One model turn: history in, final answer or tool-call request out.

use std::sync::Arc;

use tracing::debug;

use crate::error::HitlError;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::ToolRegistry;
use crate::types::{AgentToolCall, GenerationSettings, ModelMessage};

/// What the model asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A final assistant message; the turn is over.
    Final(ModelMessage),
    /// The assistant message to append, and the calls it requests in order.
    ToolCalls {
        message: ModelMessage,
        calls: Vec<AgentToolCall>,
    },
}

/// Wraps the model provider and the tool registry.
///
/// Contains no suspension logic; that lives in the tools and the
/// controller.
#[derive(Clone)]
pub struct AgentStep {
    provider: Arc<dyn ModelProvider>,
    tools: ToolRegistry,
    system_prompt: Option<String>,
    settings: GenerationSettings,
}

impl AgentStep {
    pub fn new(provider: Arc<dyn ModelProvider>, tools: ToolRegistry) -> Self {
        Self {
            provider,
            tools,
            system_prompt: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Set a system prompt sent ahead of the history on every request.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn provider(&self) -> &Arc<dyn ModelProvider> {
        &self.provider
    }

    /// Ask the model for the next move.
    ///
    /// # Errors
    ///
    /// Returns [`HitlError::UnknownTool`] if the model requests a tool that
    /// is not registered, plus any provider error.
    pub async fn step(&self, history: &[ModelMessage]) -> Result<StepOutcome, HitlError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if let Some(ref sys) = self.system_prompt {
            messages.push(ModelMessage::system(sys.clone()));
        }
        messages.extend(history.iter().cloned());

        let request = ProviderRequest {
            messages,
            settings: self.settings.clone(),
            tools: self.tools.definitions(),
        };

        let response = self.provider.generate_text(&request).await?;
        debug!(
            provider = self.provider.provider_name(),
            tool_calls = response.tool_calls.len(),
            output_tokens = response.usage.output_tokens,
            "agent step"
        );

        if response.tool_calls.is_empty() {
            return Ok(StepOutcome::Final(ModelMessage::assistant(response.text)));
        }

        if let Some(unknown) = response
            .tool_calls
            .iter()
            .find(|call| !self.tools.contains(&call.name))
        {
            return Err(HitlError::UnknownTool(unknown.name.clone()));
        }

        let calls: Vec<AgentToolCall> = response
            .tool_calls
            .into_iter()
            .map(|mut call| {
                if call.id.is_empty() {
                    call.id = format!("call_{}", uuid::Uuid::new_v4().simple());
                }
                call
            })
            .collect();

        Ok(StepOutcome::ToolCalls {
            message: ModelMessage::assistant_tool_calls(response.text, &calls),
            calls,
        })
    }
}

impl std::fmt::Debug for AgentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentStep")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.provider.model_id())
            .field("tools", &self.tools)
            .field("system_prompt", &self.system_prompt)
            .finish()
    }
}
