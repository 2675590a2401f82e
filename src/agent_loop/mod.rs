//! Interrupt/resume loop: pending approvals, events, and the controller.

pub mod approvals;
pub mod controller;
pub mod events;
pub mod types;

pub use approvals::*;
pub use controller::InterruptController;
pub use events::{AgentEvent, AgentEventSink};
pub use types::*;
