#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Session state and turn processing for the dialogue relay.
//!
//! This crate owns the only shared mutable state in the system: the mapping
//! from session id to conversation history and turn count. Transports hand
//! incoming utterances to [`DialogueManager`], which serializes turns per
//! session, forwards the context window to the reply engine, and detects
//! when a dialogue has reached its configured length.

mod manager;
mod script;
mod session;
mod store;

pub use manager::{DialogueManager, TurnError, TurnOutcome};
pub use script::DialogueScript;
pub use session::{DialogueSession, SessionState};
pub use store::{SessionStore, StoreError};
