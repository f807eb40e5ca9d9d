//! Email analysis components.
//!
//! Each model-backed component builds a prompt, calls the gateway, and collapses
//! mock mode, provider errors, and unparseable output into a complete result:
//! - `email`: single-email analysis.
//! - `batch`: concurrent analysis with summary statistics.
//! - `chat`: free-form assistant chat.
//! - `reply`: reply suggestions.
//!
//! `classify` and `priority` are purely local keyword rules.

pub mod batch;
pub mod chat;
pub mod classify;
pub mod email;
pub mod parser;
pub mod priority;
pub mod reply;
