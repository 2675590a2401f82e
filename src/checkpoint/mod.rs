//! Per-thread checkpoints: conversation log, status, and pending approval.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::agent::Conversation;
use crate::agent_loop::PendingApproval;
use crate::error::HitlError;

/// Where a thread is in the interrupt/resume cycle.
///
/// Checkpoints only ever hold `Idle` or `Suspended`; the other two are
/// reported while a call is in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThreadStatus {
    /// No turn in flight; accepts a new user message.
    Idle,
    /// A turn is executing model steps and tool calls.
    Running,
    /// Halted on a tool call; waiting for `resume` or `cancel`.
    Suspended,
    /// Replaying the suspended tool call with the supplied decision.
    Resuming,
}

/// Snapshot of one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadState {
    pub conversation: Conversation,
    pub status: ThreadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<PendingApproval>,
    pub updated_at: DateTime<Utc>,
}

impl ThreadState {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            conversation: Conversation::new(thread_id),
            status: ThreadStatus::Idle,
            pending: None,
            updated_at: Utc::now(),
        }
    }

    pub fn thread_id(&self) -> &str {
        self.conversation.thread_id()
    }

    pub fn is_suspended(&self) -> bool {
        self.status == ThreadStatus::Suspended && self.pending.is_some()
    }
}

/// Storage for thread checkpoints, keyed by thread id.
///
/// The controller only talks to this trait, so a durable backend can replace
/// [`MemoryCheckpointStore`] without touching it.
pub trait CheckpointStore: Send + Sync {
    /// Latest checkpoint for a thread, if any.
    fn get_state(&self, thread_id: &str) -> Result<Option<ThreadState>, HitlError>;

    /// Replace the checkpoint for `state.thread_id()`.
    fn put_state(&self, state: &ThreadState) -> Result<(), HitlError>;

    /// Drop a thread's checkpoint. Returns whether one existed.
    fn delete_state(&self, thread_id: &str) -> Result<bool, HitlError>;

    /// Ids of all stored threads.
    fn thread_ids(&self) -> Result<Vec<String>, HitlError>;
}

/// Process-memory store; contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    threads: Mutex<HashMap<String, ThreadState>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn threads(&self) -> MutexGuard<'_, HashMap<String, ThreadState>> {
        self.threads
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn get_state(&self, thread_id: &str) -> Result<Option<ThreadState>, HitlError> {
        Ok(self.threads().get(thread_id).cloned())
    }

    fn put_state(&self, state: &ThreadState) -> Result<(), HitlError> {
        let mut state = state.clone();
        state.updated_at = Utc::now();
        self.threads().insert(state.thread_id().to_string(), state);
        Ok(())
    }

    fn delete_state(&self, thread_id: &str) -> Result<bool, HitlError> {
        Ok(self.threads().remove(thread_id).is_some())
    }

    fn thread_ids(&self) -> Result<Vec<String>, HitlError> {
        let mut ids: Vec<String> = self.threads().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
