//! In-memory session store with per-key synchronization.

use crate::session::DialogueSession;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown session: {0}")]
    UnknownSession(String),
}

/// Mapping from session id to session state.
///
/// Entries are sharded by key: operations on one session never contend with
/// operations on another, and `get_or_create` is atomic per id. Mutating
/// accessors work on short-lived shard guards and never await.
///
/// Serializing a whole turn (including the reply-engine call) is the job of
/// the per-session [`turn_lock`](Self::turn_lock), which callers hold across
/// the turn rather than across individual store operations.
pub struct SessionStore {
    seed: String,
    sessions: DashMap<String, DialogueSession>,
    turn_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionStore {
    /// Create a store whose sessions are seeded with `seed`.
    #[must_use]
    pub fn new(seed: String) -> Self {
        Self {
            seed,
            sessions: DashMap::new(),
            turn_locks: DashMap::new(),
        }
    }

    /// Return the session for `id`, creating it if absent.
    ///
    /// Racing callers observe exactly one created session per id.
    pub fn get_or_create(&self, id: &str) -> DialogueSession {
        self.sessions
            .entry(id.to_owned())
            .or_insert_with(|| {
                info!("Creating session {id}");
                DialogueSession::new(id.to_owned(), self.seed.clone())
            })
            .clone()
    }

    /// Re-seed the session for `id`, discarding any previous state.
    pub fn reset(&self, id: &str) -> DialogueSession {
        let session = DialogueSession::new(id.to_owned(), self.seed.clone());
        self.sessions.insert(id.to_owned(), session.clone());
        info!("Reset session {id}");
        session
    }

    pub fn get(&self, id: &str) -> Result<DialogueSession, StoreError> {
        self.sessions
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| StoreError::UnknownSession(id.to_owned()))
    }

    pub fn append(&self, id: &str, utterance: String) -> Result<(), StoreError> {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSession(id.to_owned()))?;
        entry.append(utterance);
        Ok(())
    }

    /// Atomically increment the turn count, returning the new value.
    pub fn increment_turn(&self, id: &str) -> Result<u32, StoreError> {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSession(id.to_owned()))?;
        Ok(entry.increment_turn())
    }

    pub fn finalize(&self, id: &str) -> Result<(), StoreError> {
        let mut entry = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownSession(id.to_owned()))?;
        entry.finalize();
        Ok(())
    }

    /// Per-session turn lock. Turns for one id serialize on it; distinct ids
    /// get independent locks.
    pub fn turn_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.turn_locks
            .entry(id.to_owned())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
