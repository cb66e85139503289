//! Turn processing state machine.

use crate::script::DialogueScript;
use crate::store::{SessionStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use yubot_core::{ExportStamp, ReplyEngine};

/// Errors surfaced by turn processing.
///
/// Transports decide the user-visible behavior: `SessionClosed` becomes the
/// closing notice, `EngineUnavailable` is retried or skipped, and
/// `UnknownSession` maps to a generic failure.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("session {0} is closed")]
    SessionClosed(String),

    #[error("reply engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl From<StoreError> for TurnError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownSession(id) => Self::UnknownSession(id),
        }
    }
}

/// Result of one completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Utterance to send back to the user.
    pub reply: String,
    /// Whether this turn finalized the session.
    pub finalized: bool,
    /// Export identifier, present exactly when `finalized` is true.
    pub export_id: Option<String>,
}

/// Drives one conversational turn end to end.
///
/// A turn appends the incoming utterance, builds the context window, obtains
/// a reply, appends it, advances the turn count, and finalizes the session
/// once the configured dialogue length is reached. All of it happens under
/// the session's turn lock, so two turns for the same user can never
/// interleave their history writes or race the engine call.
pub struct DialogueManager {
    store: SessionStore,
    engine: Arc<dyn ReplyEngine>,
    script: DialogueScript,
    dialogue_length: u32,
    engine_timeout: Duration,
}

impl DialogueManager {
    #[must_use]
    pub fn new(
        engine: Arc<dyn ReplyEngine>,
        script: DialogueScript,
        dialogue_length: u32,
        engine_timeout: Duration,
    ) -> Self {
        let store = SessionStore::new(script.greeting.clone());
        Self {
            store,
            engine,
            script,
            dialogue_length,
            engine_timeout,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub const fn script(&self) -> &DialogueScript {
        &self.script
    }

    /// Re-seed the session for `id` and announce it to the reply engine.
    ///
    /// Returns the greeting to send. Explicit reset semantics: a returning
    /// user starts over rather than resuming.
    pub async fn start_session(&self, id: &str) -> Result<String, TurnError> {
        let lock = self.store.turn_lock(id);
        let _turn = lock.lock().await;

        let session = self.store.reset(id);
        match timeout(self.engine_timeout, self.engine.register(id)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!("Engine registration failed for session {id}: {e}");
                return Err(TurnError::EngineUnavailable(e.to_string()));
            }
            Err(_) => {
                warn!("Engine registration timed out for session {id}");
                return Err(TurnError::EngineUnavailable("registration timed out".to_string()));
            }
        }

        info!("Started session {id}");
        Ok(session.history[0].clone())
    }

    /// Process one turn for `id`.
    ///
    /// The incoming utterance is recorded before the reply is generated, so
    /// an engine failure leaves a half-applied turn: user input is never
    /// dropped, and the caller may retry reply generation.
    pub async fn process_turn(
        &self,
        id: &str,
        utterance: &str,
        stamp: &ExportStamp,
    ) -> Result<TurnOutcome, TurnError> {
        let lock = self.store.turn_lock(id);
        let _turn = lock.lock().await;

        let session = self.store.get_or_create(id);
        if session.is_finalized() {
            debug!("Rejecting turn for closed session {id}");
            return Err(TurnError::SessionClosed(id.to_owned()));
        }

        // Turn 1 is the greeting; its successor is the first user turn,
        // answered from the script before any model context exists.
        let first_user_turn = session.turn_count == 1;

        self.store.append(id, utterance.to_owned())?;
        let context = self.store.get(id)?.context_window();

        let reply = if first_user_turn {
            self.script.opener.clone()
        } else {
            self.generate(&context, id).await?
        };

        self.store.append(id, reply.clone())?;
        let count = self.store.increment_turn(id)?;

        let export_id = if count >= self.dialogue_length {
            self.store.finalize(id)?;
            info!("Session {id} finalized after {count} turns");
            Some(stamp.export_id())
        } else {
            None
        };

        debug!("Turn {count} completed for session {id}");
        Ok(TurnOutcome {
            reply,
            finalized: export_id.is_some(),
            export_id,
        })
    }

    async fn generate(&self, context: &str, id: &str) -> Result<String, TurnError> {
        match timeout(self.engine_timeout, self.engine.reply(context, id)).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                warn!("Engine reply failed for session {id}: {e}");
                Err(TurnError::EngineUnavailable(e.to_string()))
            }
            Err(_) => {
                warn!(
                    "Engine reply timed out after {}s for session {id}",
                    self.engine_timeout.as_secs()
                );
                Err(TurnError::EngineUnavailable(format!(
                    "timed out after {}s",
                    self.engine_timeout.as_secs()
                )))
            }
        }
    }
}
