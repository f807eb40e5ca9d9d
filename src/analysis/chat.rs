//! Free-form chat with the mail assistant.

use tracing::{instrument, warn};

use crate::{
    base::{config::Config, prompts, types::ChatReply},
    service::llm::{Completion, CompletionRequest, LlmClient},
};

const DEFAULT_REPLY: &str = "我是您的AI邮件助手，可以帮您管理邮件、分析内容和提供建议。";
const ERROR_REPLY: &str = "抱歉，AI服务暂时不可用，请稍后再试。";

/// Answer a chat message.
///
/// Suggestions depend only on the user's message, never on the model output.
#[instrument(skip_all)]
pub async fn chat(llm: &LlmClient, config: &Config, message: &str, context: Option<&str>) -> ChatReply {
    let request = CompletionRequest::new(config, config.chat_assistant_directive.clone(), prompts::chat_prompt(message, context));

    let reply = match llm.complete(&request).await {
        Completion::Unavailable => mock_reply(message).to_string(),
        Completion::ExternalError(detail) => {
            warn!("Chat call failed: {detail}");
            ERROR_REPLY.to_string()
        }
        Completion::Text(text) if text.trim().is_empty() => DEFAULT_REPLY.to_string(),
        Completion::Text(text) => text.trim().to_string(),
    };

    ChatReply {
        reply,
        suggestions: suggestions_for(message),
    }
}

/// Canned answer used in mock mode.
fn mock_reply(message: &str) -> &'static str {
    if message.contains("邮件") {
        "我可以帮您分析和管理邮件。您想了解什么具体信息？"
    } else if message.contains("统计") {
        "根据最新数据，您有25封未读邮件，其中5封是高优先级的。"
    } else {
        DEFAULT_REPLY
    }
}

/// Follow-up suggestions keyed on the user's message.
pub fn suggestions_for(message: &str) -> Vec<String> {
    let suggestions: &[&str] = if message.contains("邮件") {
        &["分析最新邮件", "查看高优先级邮件", "生成邮件回复"]
    } else if message.contains("统计") {
        &["查看邮件统计", "分析情感分布", "查看优先级分布"]
    } else {
        &["分析我的邮件", "查看统计信息", "获取回复建议"]
    };

    suggestions.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{base::config::ConfigInner, service::llm::MockGenericLlmClient};

    fn config() -> Config {
        ConfigInner::default().into()
    }

    #[tokio::test]
    async fn test_mock_mode_uses_keyword_reply() {
        let mut mock = MockGenericLlmClient::new();
        mock.expect_is_available().return_const(false);
        let llm = LlmClient::new(Arc::new(mock));

        let reply = chat(&llm, &config(), "我的统计数据怎么样？", None).await;

        assert!(reply.reply.contains("25封未读邮件"));
        assert_eq!(reply.suggestions[0], "查看邮件统计");
    }

    #[tokio::test]
    async fn test_model_reply_is_used_and_suggestions_follow_input() {
        let mut mock = MockGenericLlmClient::new();
        mock.expect_is_available().return_const(true);
        mock.expect_create_completion().returning(|_| Ok("  统计功能即将上线。 ".to_string()));
        let llm = LlmClient::new(Arc::new(mock));

        let reply = chat(&llm, &config(), "帮我分析一下邮件的优先级", None).await;

        assert_eq!(reply.reply, "统计功能即将上线。");
        assert_eq!(reply.suggestions, suggestions_for("邮件"));
    }

    #[tokio::test]
    async fn test_error_and_empty_replies_fall_back() {
        let mut mock = MockGenericLlmClient::new();
        mock.expect_is_available().return_const(true);
        mock.expect_create_completion().returning(|_| Err(anyhow::anyhow!("500")));
        let llm = LlmClient::new(Arc::new(mock));

        assert_eq!(chat(&llm, &config(), "你好", None).await.reply, ERROR_REPLY);

        let mut mock = MockGenericLlmClient::new();
        mock.expect_is_available().return_const(true);
        mock.expect_create_completion().returning(|_| Ok("   ".to_string()));
        let llm = LlmClient::new(Arc::new(mock));

        assert_eq!(chat(&llm, &config(), "你好", None).await.reply, DEFAULT_REPLY);
    }

    #[test]
    fn test_mail_keyword_wins_over_statistics() {
        assert_eq!(suggestions_for("邮件统计"), suggestions_for("邮件"));
        assert_eq!(suggestions_for("如何快速处理？")[0], "分析我的邮件");
    }
}
