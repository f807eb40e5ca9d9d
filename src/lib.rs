//! Library root for `mailbox-butler`.
//!
//! Mailbox-butler is a small HTTP service that forwards email text to an OpenAI
//! chat model and reshapes the answers into fixed JSON schemas:
//! - Analyse single emails or whole batches (summary, priority, sentiment, tags)
//! - Chat with a mail assistant
//! - Suggest replies
//! - Classify emails into folders and score their priority with local keyword rules
//!
//! When no OpenAI credential is configured the service runs in mock mode and answers
//! with canned results instead of failing.

pub mod analysis;
pub mod base;
pub mod api;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::{info, warn};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the HTTP server:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM client
/// - Serves the API until shutdown
pub async fn start(config: Config) -> Void {
    info!("Starting mailbox-butler ...");

    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        warn!("A rustls crypto provider was already installed");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config);

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
