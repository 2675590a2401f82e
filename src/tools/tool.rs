//! Tool trait, suspension outcome, and closure-based tool wrapper.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::AgentToolParameters;
use crate::error::HitlError;

/// Context available during tool execution.
///
/// `resume_value` is empty on the first dispatch of a call. When a suspended
/// call is replayed, it carries the human's decision.
#[derive(Debug, Clone, Default)]
pub struct ToolExecutionContext {
    pub thread_id: Option<String>,
    pub tool_call_id: Option<String>,
    resume_value: Option<String>,
}

impl ToolExecutionContext {
    pub fn new(thread_id: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            tool_call_id: Some(tool_call_id.into()),
            resume_value: None,
        }
    }

    /// Inject the value that the suspended call is waiting for.
    pub fn with_resume_value(mut self, value: impl Into<String>) -> Self {
        self.resume_value = Some(value.into());
        self
    }

    /// The externally supplied value, if this dispatch is a resume.
    pub fn resume_value(&self) -> Option<&str> {
        self.resume_value.as_deref()
    }
}

/// What a tool invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// The call finished synchronously.
    Value(serde_json::Value),
    /// The call cannot finish without external input. The controller
    /// persists the call and replays it once a resume value is supplied.
    Interrupt { prompt: String },
}

impl ToolOutput {
    pub fn interrupt(prompt: impl Into<String>) -> Self {
        Self::Interrupt {
            prompt: prompt.into(),
        }
    }

    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupt { .. })
    }
}

impl From<serde_json::Value> for ToolOutput {
    fn from(value: serde_json::Value) -> Self {
        Self::Value(value)
    }
}

/// Core tool trait; implement to create custom tools.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &AgentToolParameters;

    /// Execute the tool with parsed arguments.
    ///
    /// Tools that need a human decision return [`ToolOutput::Interrupt`]
    /// when `ctx.resume_value()` is `None`, and must not cause side
    /// effects before that value is known.
    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, HitlError>;
}

/// Type alias for the tool handler function.
type ToolHandler = dyn Fn(
        ToolArguments,
        ToolExecutionContext,
    ) -> Pin<Box<dyn Future<Output = Result<ToolOutput, HitlError>> + Send>>
    + Send
    + Sync;

/// Closure-based tool for quick tool creation.
pub struct AgentTool {
    name: String,
    description: String,
    parameters: AgentToolParameters,
    handler: Arc<ToolHandler>,
}

impl AgentTool {
    /// Create a tool from a closure.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: AgentToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolOutput, HitlError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args, ctx| Box::pin(handler(args, ctx))),
        }
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &AgentToolParameters {
        &self.parameters
    }

    async fn execute(
        &self,
        args: &ToolArguments,
        ctx: &ToolExecutionContext,
    ) -> Result<ToolOutput, HitlError> {
        (self.handler)(args.clone(), ctx.clone()).await
    }
}

impl std::fmt::Debug for AgentTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_tool_sees_resume_value() {
        let tool = AgentTool::new(
            "confirm",
            "Ask before acting",
            AgentToolParameters::empty(),
            |_args, ctx| async move {
                Ok(match ctx.resume_value() {
                    Some(answer) => ToolOutput::Value(serde_json::json!(answer)),
                    None => ToolOutput::interrupt("Proceed?"),
                })
            },
        );
        let args = ToolArguments::new(serde_json::json!({}));

        let first = tool
            .execute(&args, &ToolExecutionContext::new("t", "c"))
            .await
            .unwrap();
        assert_eq!(first, ToolOutput::interrupt("Proceed?"));

        let ctx = ToolExecutionContext::new("t", "c").with_resume_value("ok");
        let replay = tool.execute(&args, &ctx).await.unwrap();
        assert_eq!(replay, ToolOutput::Value(serde_json::json!("ok")));
    }
}
