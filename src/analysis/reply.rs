//! Reply suggestions for an email.

use tracing::{instrument, warn};

use crate::{
    analysis::parser::{self, ReplyPayload},
    base::{
        config::Config,
        prompts,
        types::{EmailInput, ReplySuggestion},
    },
    service::llm::{Completion, CompletionRequest, LlmClient},
};

const DEFAULT_TONE: &str = "professional";

/// Suggest a reply to `email`.
#[instrument(skip_all, fields(email_id = %email.email_id))]
pub async fn suggest_reply(llm: &LlmClient, config: &Config, email: &EmailInput) -> ReplySuggestion {
    let request = CompletionRequest::new(config, config.reply_generator_directive.clone(), prompts::reply_prompt(email));

    match llm.complete(&request).await {
        Completion::Unavailable => template_reply(email),
        Completion::ExternalError(detail) => {
            warn!("Reply call failed: {detail}");
            ReplySuggestion {
                suggested_reply: "感谢您的邮件，我会尽快回复您。".to_string(),
                tone: DEFAULT_TONE.to_string(),
                alternatives: vec![],
            }
        }
        Completion::Text(text) => match parser::parse::<ReplyPayload>(&text) {
            Some(payload) => ReplySuggestion {
                suggested_reply: payload.suggested_reply,
                tone: payload.tone.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| DEFAULT_TONE.to_string()),
                alternatives: payload.alternatives.unwrap_or_default(),
            },
            // Plain prose is still a usable reply.
            None => ReplySuggestion {
                suggested_reply: if text.trim().is_empty() {
                    template_reply(email).suggested_reply
                } else {
                    text.trim().to_string()
                },
                tone: DEFAULT_TONE.to_string(),
                alternatives: vec![],
            },
        },
    }
}

/// Fixed reply used in mock mode.
fn template_reply(email: &EmailInput) -> ReplySuggestion {
    ReplySuggestion {
        suggested_reply: format!("您好，\n\n感谢您的邮件。我已收到您关于「{}」的来信，会尽快处理并回复您。\n\n此致\n敬礼", email.subject),
        tone: DEFAULT_TONE.to_string(),
        alternatives: vec!["收到，谢谢！我会尽快处理。".to_string(), "感谢来信，我需要一些时间仔细考虑，稍后回复您。".to_string()],
    }
}
