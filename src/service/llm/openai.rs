//! OpenAI chat-completions implementation of the model gateway.

use std::{sync::Arc, time::Duration};

use crate::base::{config::Config, types::Res};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tokio::time::timeout;
use tracing::{debug, instrument};

use super::{CompletionRequest, GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    config: Config,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    ///
    /// Construction never touches the network, so this is safe in mock mode. The
    /// client's built-in retry on 429/5xx is disabled: one completion is one request.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let mut cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone().unwrap_or_default());

        if let Some(base) = &config.openai_api_base {
            cfg = cfg.with_api_base(base);
        }

        Self {
            client: Client::with_config(cfg).with_backoff(ExponentialBackoffBuilder::new().with_max_elapsed_time(Some(Duration::ZERO)).build()),
            config: config.clone(),
        }
    }

    /// Build the chat request for a completion.
    fn build_request(&self, request: &CompletionRequest) -> Res<CreateChatCompletionRequest> {
        Ok(CreateChatCompletionRequestArgs::default()
            .model(&self.config.openai_model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default().content(request.system_prompt.clone()).build()?.into(),
                ChatCompletionRequestUserMessageArgs::default().content(request.user_prompt.clone()).build()?.into(),
            ])
            .max_completion_tokens(request.max_tokens)
            .temperature(request.temperature)
            .build()?)
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    fn is_available(&self) -> bool {
        self.config.is_openai_available()
    }

    #[instrument(name = "OpenAiLlmClient::create_completion", skip_all)]
    async fn create_completion(&self, request: &CompletionRequest) -> Res<String> {
        let chat_request = self.build_request(request)?;

        let deadline = self.config.completion_deadline();
        let response = timeout(deadline, self.client.chat().create(chat_request))
            .await
            .map_err(|_| anyhow::anyhow!("OpenAI API call timed out after {}s", deadline.as_secs()))??;

        debug!("OpenAI returned {} choices", response.choices.len());

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("OpenAI response contained no message content"))
    }
}
