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

//! Stateless HTTP transport.
//!
//! Each request carries everything the relay needs: the landing page binds a
//! fresh session token to the client via a cookie, and every `/message` call
//! resends the recent history, so the server keeps no per-session history
//! here. Multi-turn accounting is the client's responsibility.

mod routes;

pub use routes::{AppState, MessageResponse, SESSION_COOKIE, router, serve};
