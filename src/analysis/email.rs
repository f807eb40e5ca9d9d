//! Single-email analysis.

use tracing::{info, instrument, warn};

use crate::{
    analysis::parser::{self, AnalysisPayload},
    base::{
        config::Config,
        prompts,
        types::{EmailAnalysis, EmailInput, Priority, Sentiment},
    },
    service::llm::{Completion, CompletionRequest, LlmClient},
};

const DEFAULT_SUMMARY: &str = "未知内容";

/// Analyse one email.
///
/// This never fails: mock mode, provider errors, and unparseable output each collapse
/// into a valid record whose `confidence` reflects the degraded quality.
#[instrument(skip_all, fields(email_id = %email.email_id))]
pub async fn analyze_email(llm: &LlmClient, config: &Config, email: &EmailInput) -> EmailAnalysis {
    let request = CompletionRequest::new(config, config.email_analysis_directive.clone(), prompts::email_analysis_prompt(email));

    match llm.complete(&request).await {
        Completion::Unavailable => mock_analysis(email),
        Completion::ExternalError(detail) => {
            warn!("Analysis call failed: {detail}");
            failed_analysis(email)
        }
        Completion::Text(text) => match parser::parse::<AnalysisPayload>(&text) {
            Some(payload) => {
                info!("Analysis parsed");
                from_payload(email, payload)
            }
            None => unparsed_analysis(email),
        },
    }
}

/// Merge a model payload into a record, defaulting every absent field.
///
/// Unknown priority/sentiment labels are coerced to `medium`/`neutral`, and
/// confidence is clamped into `[0, 1]`.
pub fn from_payload(email: &EmailInput, payload: AnalysisPayload) -> EmailAnalysis {
    EmailAnalysis {
        email_id: email.email_id.clone(),
        summary: payload.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
        priority: payload.priority.as_deref().map(Priority::coerce).unwrap_or_default(),
        sentiment: payload.sentiment.as_deref().map(Sentiment::coerce).unwrap_or_default(),
        suggested_reply: payload.suggested_reply,
        tags: payload.tags.unwrap_or_default(),
        // Model confidence is otherwise trusted as reported; only the range is enforced.
        confidence: payload.confidence.map(|c| c.clamp(0.0, 1.0)).unwrap_or(0.0),
        key_points: payload.key_points.unwrap_or_default(),
        action_required: payload.action_required.unwrap_or(false),
    }
}

/// Canned record used in mock mode.
pub fn mock_analysis(email: &EmailInput) -> EmailAnalysis {
    EmailAnalysis {
        email_id: email.email_id.clone(),
        summary: format!("这是一封关于 '{}' 的邮件，来自 {}", email.subject, email.sender),
        priority: Priority::Medium,
        sentiment: Sentiment::Neutral,
        suggested_reply: Some("谢谢您的邮件，我会仔细阅读并回复。".to_string()),
        tags: vec!["工作".to_string(), "待回复".to_string()],
        confidence: 0.7,
        key_points: vec!["模拟分析结果".to_string()],
        action_required: true,
    }
}

/// Record used when the provider call itself failed.
fn failed_analysis(email: &EmailInput) -> EmailAnalysis {
    EmailAnalysis {
        email_id: email.email_id.clone(),
        summary: format!("无法分析邮件 '{}'", email.subject),
        priority: Priority::Medium,
        sentiment: Sentiment::Neutral,
        suggested_reply: None,
        tags: vec!["分析失败".to_string()],
        confidence: 0.0,
        key_points: vec!["AI分析不可用".to_string()],
        action_required: false,
    }
}

/// Record used when the model answered with something that is not the expected JSON.
fn unparsed_analysis(email: &EmailInput) -> EmailAnalysis {
    EmailAnalysis {
        email_id: email.email_id.clone(),
        summary: format!("关于 '{}' 的邮件", email.subject),
        priority: Priority::Medium,
        sentiment: Sentiment::Neutral,
        suggested_reply: None,
        tags: vec!["AI分析".to_string()],
        confidence: 0.5,
        key_points: vec!["需要人工审查".to_string()],
        action_required: false,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{base::config::ConfigInner, service::llm::MockGenericLlmClient};

    fn email() -> EmailInput {
        EmailInput {
            email_id: "test-001".to_string(),
            subject: "紧急：项目进度汇报".to_string(),
            content: "需要您在今天下午5点前提交项目进度报告。".to_string(),
            sender: "manager@company.com".to_string(),
        }
    }

    fn llm_returning(result: Option<Result<&'static str, &'static str>>) -> LlmClient {
        let mut mock = MockGenericLlmClient::new();

        match result {
            None => {
                mock.expect_is_available().return_const(false);
                mock.expect_create_completion().never();
            }
            Some(result) => {
                mock.expect_is_available().return_const(true);
                mock.expect_create_completion().returning(move |_| result.map(str::to_string).map_err(|e| anyhow::anyhow!(e)));
            }
        }

        LlmClient::new(Arc::new(mock))
    }

    fn config() -> Config {
        ConfigInner::default().into()
    }

    #[tokio::test]
    async fn test_mock_mode_is_deterministic() {
        let analysis = analyze_email(&llm_returning(None), &config(), &email()).await;

        assert_eq!(analysis.confidence, 0.7);
        assert!(analysis.action_required);
        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert!(analysis.summary.contains("紧急：项目进度汇报"));
        assert!(analysis.summary.contains("manager@company.com"));
    }

    #[tokio::test]
    async fn test_external_error_yields_zero_confidence() {
        let analysis = analyze_email(&llm_returning(Some(Err("timeout"))), &config(), &email()).await;

        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.tags, vec!["分析失败".to_string()]);
        assert_eq!(analysis.key_points, vec!["AI分析不可用".to_string()]);
    }

    #[tokio::test]
    async fn test_unparseable_output_yields_half_confidence() {
        let analysis = analyze_email(&llm_returning(Some(Ok("I think this email is important."))), &config(), &email()).await;

        assert_eq!(analysis.confidence, 0.5);
        assert_eq!(analysis.tags, vec!["AI分析".to_string()]);
        assert_eq!(analysis.key_points, vec!["需要人工审查".to_string()]);
        assert!(analysis.summary.contains("紧急：项目进度汇报"));
    }

    #[tokio::test]
    async fn test_positional_array_output_is_unparsed() {
        let text = r#"["伪造摘要","high","negative","好的",["紧急"],0.99,["k"],true]"#;

        let analysis = analyze_email(&llm_returning(Some(Ok(text))), &config(), &email()).await;

        assert_eq!(analysis.confidence, 0.5);
        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.tags, vec!["AI分析".to_string()]);
        assert!(!analysis.summary.contains("伪造摘要"));
    }

    #[tokio::test]
    async fn test_payload_is_merged() {
        let text = r#"{"summary":"提交进度报告","priority":"high","sentiment":"negative","suggested_reply":"好的","tags":["工作","紧急"],"confidence":0.92,"key_points":["下午5点前"],"action_required":true}"#;

        let analysis = analyze_email(&llm_returning(Some(Ok(text))), &config(), &email()).await;

        assert_eq!(analysis.email_id, "test-001");
        assert_eq!(analysis.summary, "提交进度报告");
        assert_eq!(analysis.priority, Priority::High);
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert_eq!(analysis.suggested_reply.as_deref(), Some("好的"));
        assert_eq!(analysis.tags.len(), 2);
        assert_eq!(analysis.confidence, 0.92);
        assert!(analysis.action_required);
    }

    #[tokio::test]
    async fn test_missing_fields_take_defaults() {
        let analysis = analyze_email(&llm_returning(Some(Ok("{}"))), &config(), &email()).await;

        assert_eq!(analysis.summary, "未知内容");
        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert_eq!(analysis.suggested_reply, None);
        assert!(analysis.tags.is_empty());
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.key_points.is_empty());
        assert!(!analysis.action_required);
    }

    #[tokio::test]
    async fn test_unknown_labels_are_coerced_and_confidence_clamped() {
        let text = r#"{"priority":"critical","sentiment":"furious","confidence":7.5}"#;

        let analysis = analyze_email(&llm_returning(Some(Ok(text))), &config(), &email()).await;

        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
        assert_eq!(analysis.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_analysis_survives_json_round_trip() {
        let text = r#"{"summary":"s","priority":"low","sentiment":"positive","tags":["a"],"confidence":0.4,"key_points":["k"],"action_required":false}"#;
        let analysis = analyze_email(&llm_returning(Some(Ok(text))), &config(), &email()).await;

        let json = serde_json::to_value(&analysis).unwrap();
        let back: EmailAnalysis = serde_json::from_value(json.clone()).unwrap();

        assert_eq!(back, analysis);
        assert_eq!(serde_json::to_value(&back).unwrap(), json);
    }
}
