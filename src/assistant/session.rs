//! Chat session state
//!
//! The transcript, the pending clarification flag, and the capped
//! recent-queries list. The transcript lives and dies with the panel;
//! recent queries are hydrated from and saved to the client state store
//! by the engine.

use crate::assistant::classifier::PendingState;
use crate::assistant::templates;
use crate::models::{Message, MessageRole};

pub const RECENT_QUERIES_CAP: usize = 6;

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<Message>,
    pending: PendingState,
    recent: Vec<String>,
}

impl ChatSession {
    /// New session seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::new(MessageRole::Assistant, templates::GREETING)],
            pending: PendingState::None,
            recent: Vec::new(),
        }
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(Message::new(MessageRole::User, text));
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.messages.push(Message::new(MessageRole::Assistant, text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn pending(&self) -> PendingState {
        self.pending
    }

    pub fn await_fee_group(&mut self) {
        self.pending = PendingState::AwaitingFeeGroup;
    }

    pub fn clear_pending(&mut self) {
        self.pending = PendingState::None;
    }

    /// Most-recent-first, case-insensitive de-dup, capped.
    pub fn push_recent(&mut self, query: &str) {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return;
        }

        let lower = trimmed.to_lowercase();
        self.recent.retain(|q| q.to_lowercase() != lower);
        self.recent.insert(0, trimmed.to_string());
        self.recent.truncate(RECENT_QUERIES_CAP);
    }

    pub fn recent_queries(&self) -> &[String] {
        &self.recent
    }

    /// Restore a persisted list, re-applying the cap.
    pub fn set_recent_queries(&mut self, queries: Vec<String>) {
        self.recent = queries;
        self.recent.truncate(RECENT_QUERIES_CAP);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_seeded_with_greeting() {
        let session = ChatSession::new();

        assert_eq!(session.message_count(), 1);
        assert_eq!(session.messages()[0].role, MessageRole::Assistant);
        assert_eq!(session.messages()[0].text, templates::GREETING);
    }

    #[test]
    fn test_recent_queries_capped_most_recent_first() {
        let mut session = ChatSession::new();

        for i in 1..=7 {
            session.push_recent(&format!("query {}", i));
        }

        let recent = session.recent_queries();
        assert_eq!(recent.len(), RECENT_QUERIES_CAP);
        assert_eq!(recent[0], "query 7");
        assert_eq!(recent[5], "query 2");
    }

    #[test]
    fn test_recent_queries_dedup_case_insensitive() {
        let mut session = ChatSession::new();

        session.push_recent("What are your FEES");
        session.push_recent("current rate");
        session.push_recent("what are your fees");

        let recent = session.recent_queries();
        assert_eq!(recent.len(), 2);
        // The newest occurrence wins and moves to the front.
        assert_eq!(recent[0], "what are your fees");
        assert_eq!(recent[1], "current rate");
    }

    #[test]
    fn test_blank_queries_ignored() {
        let mut session = ChatSession::new();

        session.push_recent("   ");
        assert!(session.recent_queries().is_empty());
    }

    #[test]
    fn test_pending_state_transitions() {
        let mut session = ChatSession::new();

        assert_eq!(session.pending(), PendingState::None);
        session.await_fee_group();
        assert_eq!(session.pending(), PendingState::AwaitingFeeGroup);
        session.clear_pending();
        assert_eq!(session.pending(), PendingState::None);
    }
}
