use axum::{Json, extract::State};
use chrono::Local;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::{
    analysis::{batch, chat as chat_responder, classify, email, priority, reply},
    base::types::{
        BatchRequest, BatchResult, ChatRequest, Classification, EmailAnalysis, EmailInput, PriorityAssessment, ReplySuggestion,
    },
    runtime::Runtime,
};

use super::error::{AppError, AppJsonResult};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn timestamp() -> String {
    Local::now().to_rfc3339()
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "📧 邮箱管家 AI 服务",
        "version": SERVICE_VERSION,
        "status": "running",
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": timestamp(),
        "version": SERVICE_VERSION,
    }))
}

#[instrument(skip_all, fields(email_id = %input.email_id))]
pub async fn analyze_email(State(runtime): State<Runtime>, Json(input): Json<EmailInput>) -> AppJsonResult<EmailAnalysis> {
    let analysis = runtime.within_deadline(email::analyze_email(&runtime.llm, &runtime.config, &input)).await?;

    Ok(Json(analysis))
}

#[instrument(skip_all, fields(count = request.emails.len()))]
pub async fn analyze_batch(State(runtime): State<Runtime>, Json(request): Json<BatchRequest>) -> AppJsonResult<BatchResult> {
    let limit = runtime.config.batch_size_limit;
    if request.emails.len() > limit {
        return Err(AppError::BadRequest(format!("批量分析最多支持 {limit} 封邮件，收到 {} 封", request.emails.len())));
    }

    let result = runtime.within_deadline(batch::analyze_batch(&runtime.llm, &runtime.config, &request.emails)).await?;

    Ok(Json(result))
}

#[instrument(skip_all)]
pub async fn chat(State(runtime): State<Runtime>, Json(request): Json<ChatRequest>) -> AppJsonResult<Value> {
    // String context is used verbatim; anything else is passed as compact JSON.
    let context = match request.context {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    };

    let reply = runtime
        .within_deadline(chat_responder::chat(&runtime.llm, &runtime.config, &request.message, context.as_deref()))
        .await?;

    Ok(Json(json!({
        "reply": reply.reply,
        "timestamp": timestamp(),
        "suggestions": reply.suggestions,
    })))
}

#[instrument(skip_all, fields(email_id = %input.email_id))]
pub async fn generate_reply(State(runtime): State<Runtime>, Json(input): Json<EmailInput>) -> AppJsonResult<ReplySuggestion> {
    let suggestion = runtime.within_deadline(reply::suggest_reply(&runtime.llm, &runtime.config, &input)).await?;

    Ok(Json(suggestion))
}

pub async fn classify_email(Json(input): Json<EmailInput>) -> Json<Classification> {
    Json(classify::classify(&input))
}

pub async fn assess_priority(Json(input): Json<EmailInput>) -> Json<PriorityAssessment> {
    Json(priority::assess_priority(&input))
}

/// Placeholder counters; nothing is persisted, so these are fixed.
pub async fn stats_summary(State(runtime): State<Runtime>) -> Json<Value> {
    let status = if runtime.config.is_openai_available() { "active" } else { "mock_mode" };
    info!("Stats requested, ai status: {status}");

    Json(json!({
        "total_emails": 150,
        "unread_emails": 25,
        "high_priority": 5,
        "medium_priority": 15,
        "low_priority": 5,
        "sentiment_distribution": {
            "positive": 40,
            "neutral": 50,
            "negative": 10,
        },
        "ai_analysis_status": status,
    }))
}
