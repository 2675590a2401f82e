//! Interrupt/resume controller.
//!
//! Drives the step loop for a thread. Checkpoints are written only when a
//! turn comes to rest (idle or suspended); the in-flight status lives in
//! memory and is released when the turn's future finishes or is dropped,
//! so an abandoned turn leaves the previous checkpoint untouched. A tool that returns [`ToolOutput::Interrupt`]
//! suspends the thread; [`InterruptController::resume`] replays that call
//! with the human's decision and carries on from where the loop stopped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;

use crate::agent::{AgentStep, StepOutcome};
use crate::checkpoint::{CheckpointStore, ThreadState, ThreadStatus};
use crate::config::{HitlConfig, DEFAULT_MAX_ITERATIONS};
use crate::error::HitlError;
use crate::tools::{validate_arguments, ToolArguments, ToolExecutionContext, ToolOutput};
use crate::types::{AgentToolCall, AgentToolResult, ModelMessage};

use super::approvals::{decision_text, PendingApproval};
use super::events::{AgentEvent, AgentEventEmitter, AgentEventSink};
use super::types::{RunOutcome, APPROVAL_CANCELED, APPROVAL_EXPIRED};

/// Outcome of dispatching a single tool call.
enum Dispatch {
    Done(AgentToolResult),
    Interrupt(String),
}

type InFlight = Mutex<HashMap<String, ThreadStatus>>;

fn lock_in_flight(in_flight: &InFlight) -> MutexGuard<'_, HashMap<String, ThreadStatus>> {
    in_flight
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Marks a thread busy for the lifetime of one `send` or `resume`.
struct TurnGuard<'a> {
    in_flight: &'a InFlight,
    thread_id: String,
}

impl TurnGuard<'_> {
    fn set(&self, status: ThreadStatus) {
        lock_in_flight(self.in_flight).insert(self.thread_id.clone(), status);
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        lock_in_flight(self.in_flight).remove(&self.thread_id);
    }
}

/// Owns the step loop and thread checkpoints.
///
/// At most one approval is pending per thread. A suspended thread rejects
/// `send` until it is resumed or canceled.
pub struct InterruptController {
    step: AgentStep,
    store: Arc<dyn CheckpointStore>,
    max_iterations: usize,
    approval_ttl: Option<Duration>,
    events: AgentEventEmitter,
    in_flight: InFlight,
}

impl InterruptController {
    pub fn new(step: AgentStep, store: Arc<dyn CheckpointStore>) -> Self {
        Self {
            step,
            store,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            approval_ttl: None,
            events: AgentEventEmitter::default(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Take loop limits from a config.
    pub fn with_config(mut self, config: &HitlConfig) -> Self {
        self.max_iterations = config.max_iterations();
        self.approval_ttl = config.approval_ttl();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_approval_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.approval_ttl = ttl;
        self
    }

    pub fn with_event_sink(mut self, sink: AgentEventSink) -> Self {
        self.events = AgentEventEmitter::new(Some(sink));
        self
    }

    pub fn step(&self) -> &AgentStep {
        &self.step
    }

    pub fn store(&self) -> &Arc<dyn CheckpointStore> {
        &self.store
    }

    /// Latest resting checkpoint for a thread. A turn in flight is not
    /// visible here until it completes or suspends.
    pub fn thread_state(&self, thread_id: &str) -> Result<Option<ThreadState>, HitlError> {
        self.store.get_state(thread_id)
    }

    /// Full message log of a thread; empty if the thread is unknown.
    pub fn history(&self, thread_id: &str) -> Result<Vec<ModelMessage>, HitlError> {
        Ok(self
            .store
            .get_state(thread_id)?
            .map(|state| state.conversation.messages().to_vec())
            .unwrap_or_default())
    }

    /// Status of a thread; unknown threads are idle.
    pub fn status(&self, thread_id: &str) -> Result<ThreadStatus, HitlError> {
        if let Some(status) = lock_in_flight(&self.in_flight).get(thread_id) {
            return Ok(*status);
        }
        Ok(self
            .store
            .get_state(thread_id)?
            .map(|state| state.status)
            .unwrap_or(ThreadStatus::Idle))
    }

    /// The approval a thread is waiting on, if any.
    pub fn pending(&self, thread_id: &str) -> Result<Option<PendingApproval>, HitlError> {
        Ok(self
            .store
            .get_state(thread_id)?
            .and_then(|state| state.pending))
    }

    /// Append a user message and run the step loop.
    ///
    /// # Errors
    ///
    /// - [`HitlError::ThreadSuspended`] if an unexpired approval is pending.
    /// - [`HitlError::InvalidState`] if a turn is already in flight.
    /// - [`HitlError::IterationLimit`], [`HitlError::UnknownTool`], or any
    ///   provider error raised during the turn. The thread returns to idle
    ///   and keeps the messages appended before the failure.
    pub async fn send(&self, thread_id: &str, text: &str) -> Result<RunOutcome, HitlError> {
        let _turn = self.begin(thread_id, ThreadStatus::Running)?;
        let mut state = self
            .store
            .get_state(thread_id)?
            .unwrap_or_else(|| ThreadState::new(thread_id));

        if state.status == ThreadStatus::Suspended {
            match state.pending.take() {
                Some(pending) if pending.is_expired(self.approval_ttl, Utc::now()) => {
                    self.close_pending(&mut state, &pending, APPROVAL_EXPIRED);
                }
                Some(pending) => {
                    tracing::debug!(thread_id, approval_id = %pending.id, "send rejected: thread suspended");
                    return Err(HitlError::ThreadSuspended {
                        thread_id: thread_id.to_string(),
                    });
                }
                None => {}
            }
        }

        self.append(&mut state, ModelMessage::user(text));
        tracing::info!(thread_id, "turn started");

        let outcome = self.run_steps(&mut state, 0).await;
        self.finish(state, outcome)
    }

    /// Replay the suspended call with `decision` and continue the turn.
    ///
    /// # Errors
    ///
    /// - [`HitlError::InvalidResume`] if nothing is pending. Resuming twice
    ///   fails this way, so a decision is applied at most once.
    /// - [`HitlError::InvalidDecision`] if `decision` is not text. The
    ///   approval stays pending.
    /// - [`HitlError::ApprovalExpired`] if the approval outlived its TTL.
    ///   The approval is canceled and the thread returns to idle.
    /// - [`HitlError::InvalidState`] if the thread is busy with another call.
    ///
    /// Dropping the returned future before it resolves leaves the approval
    /// pending, so the same decision can be supplied again.
    pub async fn resume(
        &self,
        thread_id: &str,
        decision: impl Into<serde_json::Value>,
    ) -> Result<RunOutcome, HitlError> {
        let turn = self.begin(thread_id, ThreadStatus::Resuming)?;
        let mut state = self
            .store
            .get_state(thread_id)?
            .ok_or_else(|| HitlError::invalid_resume(thread_id))?;
        if state.status != ThreadStatus::Suspended {
            return Err(HitlError::invalid_resume(thread_id));
        }
        let Some(pending) = state.pending.clone() else {
            return Err(HitlError::invalid_resume(thread_id));
        };
        let decision = decision_text(decision.into())?;

        state.pending = None;
        if pending.is_expired(self.approval_ttl, Utc::now()) {
            self.close_pending(&mut state, &pending, APPROVAL_EXPIRED);
            state.status = ThreadStatus::Idle;
            self.store.put_state(&state)?;
            tracing::warn!(thread_id, approval_id = %pending.id, "approval expired");
            return Err(HitlError::ApprovalExpired {
                thread_id: thread_id.to_string(),
                approval_id: pending.id,
            });
        }

        tracing::info!(thread_id, approval_id = %pending.id, tool = %pending.tool_call.name, "resuming");
        self.events.emit(AgentEvent::Resumed {
            thread_id: thread_id.to_string(),
            approval_id: pending.id.clone(),
        });

        let outcome = self.resume_steps(&mut state, &turn, pending, decision).await;
        self.finish(state, outcome)
    }

    /// Abandon the pending approval without running the tool.
    ///
    /// Records an error result for the suspended call (and for any calls
    /// queued behind it) and returns the thread to idle.
    pub fn cancel(&self, thread_id: &str) -> Result<PendingApproval, HitlError> {
        let _turn = self.begin(thread_id, ThreadStatus::Resuming)?;
        let mut state = self
            .store
            .get_state(thread_id)?
            .ok_or_else(|| HitlError::invalid_resume(thread_id))?;
        let pending = match (state.status, state.pending.take()) {
            (ThreadStatus::Suspended, Some(pending)) => pending,
            _ => return Err(HitlError::invalid_resume(thread_id)),
        };

        self.close_pending(&mut state, &pending, APPROVAL_CANCELED);
        state.status = ThreadStatus::Idle;
        self.store.put_state(&state)?;
        tracing::info!(thread_id, approval_id = %pending.id, "approval canceled");
        Ok(pending)
    }

    /// Forget a thread entirely. Returns whether it existed.
    pub fn evict(&self, thread_id: &str) -> Result<bool, HitlError> {
        let removed = self.store.delete_state(thread_id)?;
        if removed {
            tracing::debug!(thread_id, "thread evicted");
        }
        Ok(removed)
    }

    /// Claim a thread for one operation. Fails if another is in flight.
    fn begin(&self, thread_id: &str, status: ThreadStatus) -> Result<TurnGuard<'_>, HitlError> {
        let mut in_flight = lock_in_flight(&self.in_flight);
        if in_flight.contains_key(thread_id) {
            return Err(HitlError::InvalidState(format!(
                "thread '{thread_id}' already has a turn in progress"
            )));
        }
        in_flight.insert(thread_id.to_string(), status);
        Ok(TurnGuard {
            in_flight: &self.in_flight,
            thread_id: thread_id.to_string(),
        })
    }

    async fn run_steps(
        &self,
        state: &mut ThreadState,
        first_step: usize,
    ) -> Result<RunOutcome, HitlError> {
        let thread_id = state.thread_id().to_string();
        let mut step_index = first_step;
        loop {
            if step_index >= self.max_iterations {
                return Err(HitlError::IterationLimit(self.max_iterations));
            }
            tracing::debug!(thread_id = %thread_id, iteration = step_index, "running agent step");
            self.events.emit(AgentEvent::TurnStart {
                thread_id: thread_id.clone(),
                step_index,
            });

            let outcome = self.step.step(state.conversation.messages()).await?;
            match outcome {
                StepOutcome::Final(message) => {
                    self.append(state, message.clone());
                    return Ok(RunOutcome::Completed { message });
                }
                StepOutcome::ToolCalls { message, calls } => {
                    self.append(state, message);
                    if let Some(pending) = self.run_calls(state, &calls, step_index).await? {
                        return Ok(RunOutcome::Suspended { approval: pending });
                    }
                }
            }
            step_index += 1;
        }
    }

    async fn resume_steps(
        &self,
        state: &mut ThreadState,
        turn: &TurnGuard<'_>,
        pending: PendingApproval,
        decision: String,
    ) -> Result<RunOutcome, HitlError> {
        let dispatched = self
            .dispatch(state.thread_id(), &pending.tool_call, Some(decision))
            .await?;
        match dispatched {
            Dispatch::Done(result) => {
                self.append(state, ModelMessage::tool_result(result));
            }
            Dispatch::Interrupt(prompt) => {
                let again = PendingApproval::new(
                    state.thread_id(),
                    pending.tool_call,
                    pending.remaining_calls,
                    pending.step_index,
                    prompt,
                );
                return Ok(RunOutcome::Suspended { approval: again });
            }
        }

        turn.set(ThreadStatus::Running);
        if let Some(next) = self
            .run_calls(state, &pending.remaining_calls, pending.step_index)
            .await?
        {
            return Ok(RunOutcome::Suspended { approval: next });
        }
        self.run_steps(state, pending.step_index + 1).await
    }

    /// Run calls in order. Stops at the first interrupt and returns the
    /// approval, with the calls after it queued for the resume.
    async fn run_calls(
        &self,
        state: &mut ThreadState,
        calls: &[AgentToolCall],
        step_index: usize,
    ) -> Result<Option<PendingApproval>, HitlError> {
        for (idx, call) in calls.iter().enumerate() {
            let dispatched = self.dispatch(state.thread_id(), call, None).await?;
            match dispatched {
                Dispatch::Done(result) => {
                    self.append(state, ModelMessage::tool_result(result));
                }
                Dispatch::Interrupt(prompt) => {
                    return Ok(Some(PendingApproval::new(
                        state.thread_id(),
                        call.clone(),
                        calls[idx + 1..].to_vec(),
                        step_index,
                        prompt,
                    )));
                }
            }
        }
        Ok(None)
    }

    async fn dispatch(
        &self,
        thread_id: &str,
        call: &AgentToolCall,
        resume_value: Option<String>,
    ) -> Result<Dispatch, HitlError> {
        let tool = self.step.tools().get(&call.name)?;
        self.events.emit(AgentEvent::ToolExecutionStart {
            thread_id: thread_id.to_string(),
            call: call.clone(),
            resumed: resume_value.is_some(),
        });

        let args = ToolArguments::new(call.arguments.clone());
        let checked = args.normalized().and_then(|value| {
            validate_arguments(&value, &tool.parameters().schema)
                .map_err(|violation| HitlError::InvalidArgument(violation.to_string()))
        });
        if let Err(err) = checked {
            tracing::warn!(thread_id, tool = %call.name, error = %err, "rejected tool arguments");
            return Ok(self.tool_done(thread_id, AgentToolResult::error(call, err.to_string())));
        }

        let mut ctx = ToolExecutionContext::new(thread_id, call.id.clone());
        if let Some(value) = resume_value {
            ctx = ctx.with_resume_value(value);
        }

        match tool.execute(&args, &ctx).await {
            Ok(ToolOutput::Value(value)) => {
                Ok(self.tool_done(thread_id, AgentToolResult::ok(call, value)))
            }
            Ok(ToolOutput::Interrupt { prompt }) => {
                tracing::info!(thread_id, tool = %call.name, "tool requested approval");
                Ok(Dispatch::Interrupt(prompt))
            }
            Err(err) => {
                tracing::warn!(thread_id, tool = %call.name, error = %err, "tool failed");
                Ok(self.tool_done(thread_id, AgentToolResult::error(call, err.to_string())))
            }
        }
    }

    fn tool_done(&self, thread_id: &str, result: AgentToolResult) -> Dispatch {
        self.events.emit(AgentEvent::ToolExecutionEnd {
            thread_id: thread_id.to_string(),
            result: result.clone(),
        });
        Dispatch::Done(result)
    }

    /// Record `reason` as the result of the pending call and its queue.
    fn close_pending(&self, state: &mut ThreadState, pending: &PendingApproval, reason: &str) {
        for call in std::iter::once(&pending.tool_call).chain(&pending.remaining_calls) {
            self.append(state, ModelMessage::tool_result(AgentToolResult::error(call, reason)));
        }
        state.pending = None;
        self.events.emit(AgentEvent::ApprovalCanceled {
            thread_id: state.thread_id().to_string(),
            approval_id: pending.id.clone(),
            reason: reason.to_string(),
        });
    }

    fn append(&self, state: &mut ThreadState, message: ModelMessage) {
        let role = message.role;
        let index = state.conversation.append(message);
        self.events.emit(AgentEvent::MessageAppended {
            thread_id: state.thread_id().to_string(),
            index,
            role,
        });
    }

    /// Persist the resting state of a `send` or `resume`.
    fn finish(
        &self,
        mut state: ThreadState,
        outcome: Result<RunOutcome, HitlError>,
    ) -> Result<RunOutcome, HitlError> {
        let thread_id = state.thread_id().to_string();
        match outcome {
            Ok(RunOutcome::Suspended { approval }) => {
                state.status = ThreadStatus::Suspended;
                state.pending = Some(approval.clone());
                self.store.put_state(&state)?;
                tracing::info!(
                    thread_id = %thread_id,
                    approval_id = %approval.id,
                    tool = %approval.tool_call.name,
                    "thread suspended"
                );
                self.events.emit(AgentEvent::ApprovalRequired {
                    approval: approval.clone(),
                });
                self.events.emit(AgentEvent::TurnEnd {
                    thread_id,
                    suspended: true,
                });
                Ok(RunOutcome::Suspended { approval })
            }
            Ok(completed) => {
                state.status = ThreadStatus::Idle;
                state.pending = None;
                self.store.put_state(&state)?;
                tracing::info!(thread_id = %thread_id, messages = state.conversation.len(), "turn completed");
                self.events.emit(AgentEvent::TurnEnd {
                    thread_id,
                    suspended: false,
                });
                Ok(completed)
            }
            Err(err) => {
                state.status = ThreadStatus::Idle;
                state.pending = None;
                self.store.put_state(&state)?;
                tracing::warn!(thread_id = %thread_id, error = %err, "turn failed");
                self.events.emit(AgentEvent::Error {
                    thread_id,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for InterruptController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptController")
            .field("step", &self.step)
            .field("max_iterations", &self.max_iterations)
            .field("approval_ttl", &self.approval_ttl)
            .finish()
    }
}
