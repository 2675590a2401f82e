//! Events emitted by the interrupt/resume controller.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{AgentToolCall, AgentToolResult, Role};

use super::approvals::PendingApproval;

/// Callback receiving controller events.
pub type AgentEventSink = Arc<dyn Fn(AgentEvent) + Send + Sync>;

/// Controller events, in emission order within a thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    TurnStart {
        thread_id: String,
        step_index: usize,
    },
    MessageAppended {
        thread_id: String,
        index: usize,
        role: Role,
    },
    ToolExecutionStart {
        thread_id: String,
        call: AgentToolCall,
        resumed: bool,
    },
    ToolExecutionEnd {
        thread_id: String,
        result: AgentToolResult,
    },
    ApprovalRequired {
        approval: PendingApproval,
    },
    Resumed {
        thread_id: String,
        approval_id: String,
    },
    ApprovalCanceled {
        thread_id: String,
        approval_id: String,
        reason: String,
    },
    TurnEnd {
        thread_id: String,
        suspended: bool,
    },
    Error {
        thread_id: String,
        error: String,
    },
}

/// Wraps an optional sink so call sites can emit unconditionally.
#[derive(Clone, Default)]
pub(crate) struct AgentEventEmitter {
    sink: Option<AgentEventSink>,
}

impl AgentEventEmitter {
    pub(crate) fn new(sink: Option<AgentEventSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn emit(&self, event: AgentEvent) {
        if let Some(ref sink) = self.sink {
            sink(event);
        }
    }
}
