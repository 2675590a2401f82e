//! Outcome types for the interrupt/resume controller.

use serde::{Deserialize, Serialize};

use crate::types::ModelMessage;

use super::approvals::PendingApproval;

/// Result of `send` or `resume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The model produced a final assistant message.
    Completed { message: ModelMessage },
    /// A tool call is waiting for a human decision.
    Suspended { approval: PendingApproval },
}

impl RunOutcome {
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended { .. })
    }

    pub fn pending(&self) -> Option<&PendingApproval> {
        match self {
            Self::Suspended { approval } => Some(approval),
            Self::Completed { .. } => None,
        }
    }

    pub fn final_message(&self) -> Option<&ModelMessage> {
        match self {
            Self::Completed { message } => Some(message),
            Self::Suspended { .. } => None,
        }
    }
}

/// Result text recorded for a call whose approval was canceled.
pub const APPROVAL_CANCELED: &str = "approval canceled";
/// Result text recorded for a call whose approval expired.
pub const APPROVAL_EXPIRED: &str = "approval expired";
