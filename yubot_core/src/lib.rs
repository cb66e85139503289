#![deny(
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

use async_trait::async_trait;

pub mod context;
pub mod export;

pub use context::{CONTEXT_SEPARATOR, CONTEXT_WINDOW, context_window};
pub use export::ExportStamp;

/// External reply-generation service.
///
/// The engine maps a joined context string to a reply for a given session.
/// Calls for unrelated sessions may run concurrently; the engine keeps
/// whatever per-session state it needs behind `register`.
#[async_trait]
pub trait ReplyEngine: Send + Sync {
    /// Announce a fresh session id before its first reply request.
    async fn register(&self, id: &str) -> anyhow::Result<()>;

    /// Generate an utterance for the joined context window.
    async fn reply(&self, context: &str, id: &str) -> anyhow::Result<String>;
}
