pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tracing::{instrument, warn};

use crate::base::{config::Config, types::Res};

// Types.

/// A single chat-completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    /// Build a request using the configured token limit and temperature.
    pub fn new(config: &Config, system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: config.openai_max_tokens,
            temperature: config.openai_temperature,
        }
    }
}

/// Outcome of one gateway call.
///
/// `Unavailable` is mock mode (no credential), not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Text(String),
    Unavailable,
    ExternalError(String),
}

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// Implementing this trait allows different completion providers (or test doubles)
/// to back the analyzers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Whether a credential is configured.
    ///
    /// When this is `false`, no network call is ever attempted.
    fn is_available(&self) -> bool;

    /// Run one completion and return the raw text of the first choice.
    async fn create_completion(&self, request: &CompletionRequest) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }

    /// Run a completion, folding every failure mode into a [`Completion`].
    #[instrument(name = "LlmClient::complete", skip_all)]
    pub async fn complete(&self, request: &CompletionRequest) -> Completion {
        if !self.inner.is_available() {
            return Completion::Unavailable;
        }

        match self.inner.create_completion(request).await {
            Ok(text) => Completion::Text(text),
            Err(err) => {
                warn!("Completion failed: {err}");
                Completion::ExternalError(err.to_string())
            }
        }
    }
}
