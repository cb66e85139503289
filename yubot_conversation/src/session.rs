//! Per-user dialogue session state.

use chrono::{DateTime, Utc};
use yubot_core::context_window;

/// Lifecycle state of a session.
///
/// A session leaves `Active` exactly once, on the turn where its count first
/// reaches the configured dialogue length. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Finalized,
}

/// A dialogue session with its full utterance history.
#[derive(Debug, Clone)]
pub struct DialogueSession {
    /// Session identifier (the transport's persistent user key).
    pub id: String,
    /// Ordered utterance history, user and system turns interleaved.
    pub history: Vec<String>,
    /// Completed turn count; the seeding greeting counts as turn 1.
    pub turn_count: u32,
    /// Lifecycle state.
    pub state: SessionState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DialogueSession {
    /// Create a session seeded with the initial system utterance.
    #[must_use]
    pub fn new(id: String, seed: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            history: vec![seed],
            turn_count: 1,
            state: SessionState::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append an utterance to the history.
    pub fn append(&mut self, utterance: String) {
        self.history.push(utterance);
        self.updated_at = Utc::now();
    }

    /// Increment the turn count and return the new value.
    pub fn increment_turn(&mut self) -> u32 {
        self.turn_count += 1;
        self.updated_at = Utc::now();
        self.turn_count
    }

    /// Mark the session finalized.
    pub fn finalize(&mut self) {
        self.state = SessionState::Finalized;
        self.updated_at = Utc::now();
    }

    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        matches!(self.state, SessionState::Finalized)
    }

    /// Context window over the trailing history entries.
    #[must_use]
    pub fn context_window(&self) -> String {
        context_window(&self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_seeded() {
        let session = DialogueSession::new("u1".to_string(), "greeting".to_string());
        assert_eq!(session.history, vec!["greeting".to_string()]);
        assert_eq!(session.turn_count, 1);
        assert_eq!(session.state, SessionState::Active);
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut session = DialogueSession::new("u1".to_string(), "a".to_string());
        session.append("b".to_string());
        session.append("c".to_string());
        assert_eq!(session.history, vec!["a", "b", "c"]);
    }

    #[test]
    fn turn_count_increments_by_one() {
        let mut session = DialogueSession::new("u1".to_string(), "a".to_string());
        assert_eq!(session.increment_turn(), 2);
        assert_eq!(session.increment_turn(), 3);
    }

    #[test]
    fn context_window_uses_last_two_entries() {
        let mut session = DialogueSession::new("u1".to_string(), "a".to_string());
        assert_eq!(session.context_window(), "a");
        session.append("b".to_string());
        session.append("c".to_string());
        assert_eq!(session.context_window(), "b [SEP] c");
    }

    #[test]
    fn finalize_is_terminal() {
        let mut session = DialogueSession::new("u1".to_string(), "a".to_string());
        session.finalize();
        assert!(session.is_finalized());
    }
}
