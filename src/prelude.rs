//! Convenience re-exports for common use.

pub use crate::agent::{AgentStep, Conversation, StepOutcome};
pub use crate::agent_loop::{AgentEvent, AgentEventSink, InterruptController, PendingApproval, RunOutcome};
pub use crate::checkpoint::{CheckpointStore, MemoryCheckpointStore, ThreadState, ThreadStatus};
pub use crate::config::HitlConfig;
pub use crate::driver::{ConsoleInput, Driver, HumanInput, TurnReport};
pub use crate::error::{HitlError, Result};
pub use crate::models::{ModelSpec, ProviderKey};
pub use crate::provider::{create_provider, ModelProvider};
pub use crate::tools::{
    AgentTool, AgentToolParameters, Tool, ToolArguments, ToolExecutionContext, ToolOutput,
    ToolRegistry,
};
pub use crate::types::{
    AgentToolCall, AgentToolResult, ContentPart, GenerationSettings, ModelMessage, Role, Usage,
};
