//! Core components, types, and utilities for mailbox-butler.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - System prompts and prompt builders for LLM interactions.
//! - Request, result, and common types.

pub mod config;
pub mod prompts;
pub mod types;
