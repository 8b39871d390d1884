//! Legal Ally conversation core
//!
//! A session controller for a chat with a legal-analysis backend: the
//! ordered message log, at most one query in flight, optimistic user
//! messages and a synthesized reply when the backend cannot be reached.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod api;
pub mod config;
pub mod conversation;
pub mod prompts;
pub mod runtime;
pub mod state_machine;
pub mod transport;
