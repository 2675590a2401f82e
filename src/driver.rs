//! Turn driver: send, ask the human on suspension, resume until done.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::agent_loop::{InterruptController, RunOutcome};
use crate::error::HitlError;
use crate::types::ModelMessage;

/// Source of human decisions for suspended tool calls.
#[async_trait]
pub trait HumanInput: Send + Sync {
    /// Show `prompt` and return the human's answer.
    async fn ask(&self, prompt: &str) -> Result<String, HitlError>;
}

/// Reads answers from stdin, one line each.
///
/// Shares a single buffered reader, so the same instance can also serve
/// the chat prompt via [`ConsoleInput::read_line`].
pub struct ConsoleInput {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Print `label` without a newline and read one line. `None` on EOF.
    pub async fn read_line(&self, label: &str) -> Result<Option<String>, HitlError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(label.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.lock().await.next_line().await?)
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HumanInput for ConsoleInput {
    async fn ask(&self, prompt: &str) -> Result<String, HitlError> {
        println!("\nSYSTEM PAUSED: Approval Required");
        println!("{prompt}");
        match self.read_line("Approve (yes/no): ").await? {
            Some(answer) => Ok(answer),
            None => {
                tracing::warn!("stdin closed while waiting for approval; declining");
                Ok(String::new())
            }
        }
    }
}

/// One prompt shown to the human and the answer given.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalExchange {
    pub prompt: String,
    pub decision: String,
}

/// What a completed turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub thread_id: String,
    pub final_message: ModelMessage,
    /// Messages appended to the log during this turn, user message first.
    pub appended: Vec<ModelMessage>,
    pub approvals: Vec<ApprovalExchange>,
}

/// Runs whole turns against a controller, routing approvals to a human.
pub struct Driver<H: HumanInput> {
    controller: InterruptController,
    human: H,
}

impl<H: HumanInput> Driver<H> {
    pub fn new(controller: InterruptController, human: H) -> Self {
        Self { controller, human }
    }

    pub fn controller(&self) -> &InterruptController {
        &self.controller
    }

    pub fn human(&self) -> &H {
        &self.human
    }

    /// Send `text` and resolve every approval the turn raises.
    ///
    /// Completed tool calls are never re-run: their results are already in
    /// the log, and a resume only replays the suspended call.
    pub async fn run_turn(&self, thread_id: &str, text: &str) -> Result<TurnReport, HitlError> {
        let start = self.controller.history(thread_id)?.len();
        let mut approvals = Vec::new();

        let mut outcome = self.controller.send(thread_id, text).await?;
        let final_message = loop {
            match outcome {
                RunOutcome::Completed { message } => break message,
                RunOutcome::Suspended { approval } => {
                    let decision = self.human.ask(&approval.prompt_text).await?;
                    tracing::debug!(thread_id, approval_id = %approval.id, "decision collected");
                    approvals.push(ApprovalExchange {
                        prompt: approval.prompt_text,
                        decision: decision.clone(),
                    });
                    outcome = self.controller.resume(thread_id, decision).await?;
                }
            }
        };

        let history = self.controller.history(thread_id)?;
        Ok(TurnReport {
            thread_id: thread_id.to_string(),
            final_message,
            appended: history.get(start..).map(<[_]>::to_vec).unwrap_or_default(),
            approvals,
        })
    }
}
