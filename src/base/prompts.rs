//! Prompt templates for LLM usage.

use crate::base::types::EmailInput;

/// System directive for single-email analysis.
pub const EMAIL_ANALYSIS_SYSTEM_DIRECTIVE: &str = r#####"
你是一个专业的邮件分析助手，能够准确分析邮件内容并提供有用的建议。
请分析邮件的重要性、情感倾向、关键信息，并提供合理的处理建议。
请用JSON格式返回分析结果，包括摘要、优先级、情感、标签和关键要点。
只返回JSON本身，不要使用代码块，也不要附加任何其他文字。
"#####;

/// System directive for the chat assistant.
pub const CHAT_ASSISTANT_SYSTEM_DIRECTIVE: &str = r#####"
你是一个专业的邮件管理助手，可以帮助用户分析邮件、提供建议和回答相关问题。
请用中文回复，语气友好专业。能够理解用户的需求并提供实用的建议。
"#####;

/// System directive for reply generation.
pub const REPLY_GENERATOR_SYSTEM_DIRECTIVE: &str = r#####"
你是一个专业的邮件回复助手，能够生成合适的邮件回复内容。
请根据原邮件的内容和语调，生成得体、专业的回复，考虑商务礼仪和沟通效果。
只返回JSON本身，不要使用代码块，也不要附加任何其他文字。
"#####;

/// Build the user prompt for analysing one email.
///
/// The model is asked for exactly the eight fields of an analysis record.
pub fn email_analysis_prompt(email: &EmailInput) -> String {
    format!(
        r#"请分析以下邮件：

发件人：{sender}
主题：{subject}
内容：
{content}

请返回如下格式的JSON：
{{
  "summary": "邮件摘要（不超过100字）",
  "priority": "high | medium | low",
  "sentiment": "positive | neutral | negative",
  "suggested_reply": "建议的回复内容",
  "tags": ["最多5个标签"],
  "confidence": 0.0到1.0之间的置信度,
  "key_points": ["关键要点"],
  "action_required": true或false
}}"#,
        sender = email.sender,
        subject = email.subject,
        content = email.content,
    )
}

/// Build the user prompt for a chat message, with optional caller context.
pub fn chat_prompt(message: &str, context: Option<&str>) -> String {
    match context {
        Some(context) if !context.trim().is_empty() => format!("上下文信息：\n{context}\n\n用户问题：\n{message}"),
        _ => message.to_string(),
    }
}

/// Build the user prompt asking for a reply suggestion.
pub fn reply_prompt(email: &EmailInput) -> String {
    format!(
        r#"请为以下邮件生成回复建议：

发件人：{sender}
主题：{subject}
内容：
{content}

请返回如下格式的JSON：
{{
  "suggested_reply": "建议的回复内容",
  "tone": "回复语调，例如 professional、friendly、formal",
  "alternatives": ["备选回复1", "备选回复2"]
}}"#,
        sender = email.sender,
        subject = email.subject,
        content = email.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> EmailInput {
        EmailInput {
            email_id: "e1".to_string(),
            subject: "项目进度".to_string(),
            content: "请在周五前提交报告".to_string(),
            sender: "manager@company.com".to_string(),
        }
    }

    #[test]
    fn test_email_analysis_prompt_embeds_email_and_fields() {
        let prompt = email_analysis_prompt(&email());

        assert!(prompt.contains("manager@company.com"));
        assert!(prompt.contains("项目进度"));
        assert!(prompt.contains("请在周五前提交报告"));

        for field in ["summary", "priority", "sentiment", "suggested_reply", "tags", "confidence", "key_points", "action_required"] {
            assert!(prompt.contains(field), "prompt is missing `{field}`");
        }
    }

    #[test]
    fn test_chat_prompt_skips_blank_context() {
        assert_eq!(chat_prompt("你好", None), "你好");
        assert_eq!(chat_prompt("你好", Some("  ")), "你好");
        assert!(chat_prompt("你好", Some("未读 25 封")).contains("未读 25 封"));
    }
}
