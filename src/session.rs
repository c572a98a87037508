//! Session state — the conversation transcript and the policy toggles that
//! govern it.
//!
//! A `Session` is owned by exactly one interactive loop; nothing here is
//! shared across sessions, so no locking is needed. The conversation is
//! append-only and messages are immutable once pushed.

use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry. `blocked` marks a terminal system notice produced by
/// the security guard in place of model output — blocked content never
/// passes through mitigation or sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub blocked: bool,
    /// Per-conversation ordinal; insertion order is chronological.
    pub seq: u64,
}

/// Append-only message history for one session.
#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn push(&mut self, role: Role, content: impl Into<String>, blocked: bool) -> &ChatMessage {
        let seq = self.messages.len() as u64;
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
            blocked,
            seq,
        });
        // Just pushed, so last() is always Some.
        self.messages.last().expect("conversation push")
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// One interactive session: its policy toggles and its transcript.
/// Passed by reference into the pipeline — there is no ambient global state.
#[derive(Debug, Default)]
pub struct Session {
    pub policy: PolicyConfig,
    pub conversation: Conversation,
}

impl Session {
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            policy,
            conversation: Conversation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_sequential_ordinals() {
        let mut conv = Conversation::default();
        conv.push(Role::User, "first", false);
        conv.push(Role::Assistant, "second", false);
        conv.push(Role::User, "third", false);

        let seqs: Vec<u64> = conv.messages().iter().map(|m| m.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn push_returns_the_appended_message() {
        let mut conv = Conversation::default();
        let msg = conv.push(Role::Assistant, "hello", true);
        assert_eq!(msg.content, "hello");
        assert!(msg.blocked);
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
