//! Append-only conversation log for one thread.

use serde::{Deserialize, Serialize};

use crate::types::ModelMessage;

/// Ordered message history of a thread.
///
/// Messages can only be appended; a message's identity is its index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    thread_id: String,
    messages: Vec<ModelMessage>,
}

impl Conversation {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            messages: Vec::new(),
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    /// Append a message and return its index.
    pub fn append(&mut self, message: ModelMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Get all messages.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Messages appended at or after `index`.
    pub fn since(&self, index: usize) -> &[ModelMessage] {
        &self.messages[index.min(self.messages.len())..]
    }

    /// Get the last N messages.
    pub fn last_n(&self, n: usize) -> &[ModelMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn last(&self) -> Option<&ModelMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_returns_position() {
        let mut conversation = Conversation::new("buy_thread");
        assert_eq!(conversation.append(ModelMessage::user("hi")), 0);
        assert_eq!(conversation.append(ModelMessage::assistant("hello")), 1);
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.thread_id(), "buy_thread");
    }

    #[test]
    fn since_and_last_n_clamp() {
        let mut conversation = Conversation::new("t");
        conversation.append(ModelMessage::user("a"));
        conversation.append(ModelMessage::user("b"));
        assert_eq!(conversation.since(1)[0].text(), "b");
        assert!(conversation.since(10).is_empty());
        assert_eq!(conversation.last_n(5).len(), 2);
    }
}
