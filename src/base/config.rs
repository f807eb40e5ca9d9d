//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc, time::Duration};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default OpenAI model to use.
fn default_openai_model() -> String {
    "gpt-3.5-turbo".to_string()
}

/// Default max output tokens for OpenAI model.
fn default_openai_max_tokens() -> u32 {
    500
}

/// Default sampling temperature.
fn default_openai_temperature() -> f32 {
    0.3
}

/// Default per-call timeout, in seconds. Kept below the default request deadline.
fn default_openai_timeout() -> u64 {
    25
}

fn default_ai_service_host() -> String {
    "0.0.0.0".to_string()
}

fn default_ai_service_port() -> u16 {
    8001
}

fn default_batch_size_limit() -> usize {
    50
}

fn default_analysis_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    3600
}

/// Default system directive for email analysis.
fn default_email_analysis_directive() -> String {
    prompts::EMAIL_ANALYSIS_SYSTEM_DIRECTIVE.to_string()
}

/// Default system directive for the chat assistant.
fn default_chat_assistant_directive() -> String {
    prompts::CHAT_ASSISTANT_SYSTEM_DIRECTIVE.to_string()
}

/// Default system directive for reply generation.
fn default_reply_generator_directive() -> String {
    prompts::REPLY_GENERATOR_SYSTEM_DIRECTIVE.to_string()
}

/// Configuration for the mailbox-butler service.
///
/// Constructed once at startup and handed to every component; nothing reads the
/// environment after [`Config::load`].
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// OpenAI API key (`OPENAI_API_KEY`). Absent means mock mode.
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Optional OpenAI-compatible base URL (`OPENAI_API_BASE`).
    #[serde(default)]
    pub openai_api_base: Option<String>,
    /// OpenAI model to use (`OPENAI_MODEL`).
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    /// Max output tokens per completion (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Sampling temperature (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Per-call timeout in seconds for a single completion (`OPENAI_TIMEOUT`).
    #[serde(default = "default_openai_timeout")]
    pub openai_timeout: u64,
    /// Bind host (`AI_SERVICE_HOST`).
    #[serde(default = "default_ai_service_host")]
    pub ai_service_host: String,
    /// Bind port (`AI_SERVICE_PORT`).
    #[serde(default = "default_ai_service_port")]
    pub ai_service_port: u16,
    /// Maximum number of emails accepted by one batch request (`BATCH_SIZE_LIMIT`).
    #[serde(default = "default_batch_size_limit")]
    pub batch_size_limit: usize,
    /// Overall per-request deadline in seconds (`ANALYSIS_TIMEOUT`).
    #[serde(default = "default_analysis_timeout")]
    pub analysis_timeout: u64,
    /// Cache TTL in seconds (`CACHE_TTL`). Reserved; nothing is cached.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
    /// Optional override of the analysis system directive (`EMAIL_ANALYSIS_DIRECTIVE`).
    #[serde(default = "default_email_analysis_directive")]
    pub email_analysis_directive: String,
    /// Optional override of the chat system directive (`CHAT_ASSISTANT_DIRECTIVE`).
    #[serde(default = "default_chat_assistant_directive")]
    pub chat_assistant_directive: String,
    /// Optional override of the reply system directive (`REPLY_GENERATOR_DIRECTIVE`).
    #[serde(default = "default_reply_generator_directive")]
    pub reply_generator_directive: String,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_api_base: None,
            openai_model: default_openai_model(),
            openai_max_tokens: default_openai_max_tokens(),
            openai_temperature: default_openai_temperature(),
            openai_timeout: default_openai_timeout(),
            ai_service_host: default_ai_service_host(),
            ai_service_port: default_ai_service_port(),
            batch_size_limit: default_batch_size_limit(),
            analysis_timeout: default_analysis_timeout(),
            cache_ttl: default_cache_ttl(),
            email_analysis_directive: default_email_analysis_directive(),
            chat_assistant_directive: default_chat_assistant_directive(),
            reply_generator_directive: default_reply_generator_directive(),
        }
    }
}

impl ConfigInner {
    /// Whether a usable OpenAI credential is configured.
    pub fn is_openai_available(&self) -> bool {
        self.openai_api_key.as_deref().is_some_and(|key| key.starts_with("sk-"))
    }

    /// Overall deadline for one request.
    pub fn analysis_deadline(&self) -> Duration {
        Duration::from_secs(self.analysis_timeout)
    }

    /// Deadline for one outbound completion.
    pub fn completion_deadline(&self) -> Duration {
        Duration::from_secs(self.openai_timeout)
    }

    /// The `host:port` address to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ai_service_host, self.ai_service_port)
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().try_parsing(true));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result: Config = cfg.build()?.try_deserialize::<ConfigInner>()?.into();

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.openai_temperature < 0.0 || self.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if self.batch_size_limit < 1 {
            return Err(anyhow::anyhow!("Batch size limit must be at least 1."));
        }

        if self.analysis_timeout < 1 || self.openai_timeout < 1 {
            return Err(anyhow::anyhow!("Timeouts must be at least 1 second."));
        }

        // A provider call must give up before the request deadline, or a slow provider
        // turns per-item fallbacks into a 504 for the whole request.
        if self.openai_timeout >= self.analysis_timeout {
            return Err(anyhow::anyhow!(
                "OpenAI timeout ({}s) must be shorter than the analysis timeout ({}s).",
                self.openai_timeout,
                self.analysis_timeout
            ));
        }

        Ok(())
    }
}
