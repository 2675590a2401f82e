//! Error classification shared by the controller, CLI, and tests.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Misuse of the interrupt/resume protocol (resume with nothing pending,
    /// message sent to a suspended thread, expired approval).
    Protocol,
    /// The model asked for something the registry cannot serve.
    Tool,
    Authentication,
    RateLimit,
    Network,
    Api,
    Configuration,
    Serialization,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Answer or cancel the outstanding approval first.
    ResolvePendingApproval,
    /// Start a new turn; the thread is idle again.
    StartNewTurn,
    CheckCredentials,
    CheckConfiguration,
    CheckToolRegistry,
    ContactSupport,
}
