//! Pending approval record and decision handling.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HitlError;
use crate::types::AgentToolCall;

/// A tool call that stopped to wait for a human decision.
///
/// Holds everything needed to replay the call later: the call itself, the
/// calls that came after it in the same model step, and which step that was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingApproval {
    pub id: String,
    pub thread_id: String,
    pub tool_call: AgentToolCall,
    #[serde(default)]
    pub remaining_calls: Vec<AgentToolCall>,
    pub step_index: usize,
    pub prompt_text: String,
    pub created_at: DateTime<Utc>,
}

impl PendingApproval {
    pub fn new(
        thread_id: impl Into<String>,
        tool_call: AgentToolCall,
        remaining_calls: Vec<AgentToolCall>,
        step_index: usize,
        prompt_text: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            thread_id: thread_id.into(),
            tool_call,
            remaining_calls,
            step_index,
            prompt_text: prompt_text.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether the approval outlived `ttl` at `now`. No TTL never expires.
    pub fn is_expired(&self, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return false;
        };
        now - self.created_at > ttl
    }
}

/// Extract the decision text from a resume value.
///
/// Only JSON strings are decisions; what the text means is up to the tool.
pub fn decision_text(value: serde_json::Value) -> Result<String, HitlError> {
    match value {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Null => Err(HitlError::InvalidDecision("null".into())),
        serde_json::Value::Bool(_) => Err(HitlError::InvalidDecision("boolean".into())),
        serde_json::Value::Number(_) => Err(HitlError::InvalidDecision("number".into())),
        serde_json::Value::Array(_) => Err(HitlError::InvalidDecision("array".into())),
        serde_json::Value::Object(_) => Err(HitlError::InvalidDecision("object".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> PendingApproval {
        PendingApproval::new(
            "t",
            AgentToolCall {
                id: "c".into(),
                name: "buy_stocks".into(),
                arguments: serde_json::json!({}),
            },
            vec![],
            0,
            "Approve?",
        )
    }

    #[test]
    fn no_ttl_never_expires() {
        let p = pending();
        assert!(!p.is_expired(None, p.created_at + chrono::Duration::days(365)));
    }

    #[test]
    fn expires_after_ttl() {
        let p = pending();
        let ttl = Some(Duration::from_secs(60));
        assert!(!p.is_expired(ttl, p.created_at + chrono::Duration::seconds(59)));
        assert!(p.is_expired(ttl, p.created_at + chrono::Duration::seconds(61)));
    }

    #[test]
    fn only_strings_are_decisions() {
        assert_eq!(decision_text(serde_json::json!(" YES ")).unwrap(), " YES ");
        assert!(matches!(
            decision_text(serde_json::json!(true)),
            Err(HitlError::InvalidDecision(kind)) if kind == "boolean"
        ));
        assert!(decision_text(serde_json::json!({"answer": "yes"})).is_err());
    }
}
