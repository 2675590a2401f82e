//! Agent building blocks: the conversation log and the model step.

pub mod conversation;
pub mod step;

pub use conversation::Conversation;
pub use step::{AgentStep, StepOutcome};
