//! Error types for hitl-agent.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all agent operations.
#[derive(Error, Debug)]
pub enum HitlError {
    #[error("Unknown tool requested by model: {0}")]
    UnknownTool(String),

    #[error("No pending approval for thread '{thread_id}'")]
    InvalidResume { thread_id: String },

    #[error("Invalid decision: expected text, got {0}")]
    InvalidDecision(String),

    #[error("Thread '{thread_id}' is waiting for approval; resume or cancel it first")]
    ThreadSuspended { thread_id: String },

    #[error("Approval {approval_id} for thread '{thread_id}' expired")]
    ApprovalExpired {
        thread_id: String,
        approval_id: String,
    },

    #[error("Tool loop exceeded {0} iterations")]
    IterationLimit(usize),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl HitlError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_resume(thread_id: impl Into<String>) -> Self {
        Self::InvalidResume {
            thread_id: thread_id.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidResume { .. }
            | Self::InvalidDecision(_)
            | Self::ThreadSuspended { .. }
            | Self::ApprovalExpired { .. }
            | Self::IterationLimit(_)
            | Self::InvalidState(_) => ErrorCategory::Protocol,
            Self::UnknownTool(_) | Self::InvalidArgument(_) => ErrorCategory::Tool,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) | Self::Io(_) => ErrorCategory::Network,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::ThreadSuspended { .. } | Self::InvalidDecision(_) => {
                RecoverySuggestion::ResolvePendingApproval
            }
            Self::InvalidResume { .. }
            | Self::ApprovalExpired { .. }
            | Self::IterationLimit(_) => RecoverySuggestion::StartNewTurn,
            _ => match self.category() {
                ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
                ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
                ErrorCategory::Tool => RecoverySuggestion::CheckToolRegistry,
                _ => RecoverySuggestion::ContactSupport,
            },
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HitlError>;
