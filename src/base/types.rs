use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Email input.

/// A single email submitted for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailInput {
    /// Client-side identifier, echoed back in every result.
    #[serde(alias = "id")]
    pub email_id: String,
    pub subject: String,
    pub content: String,
    pub sender: String,
}

/// Body of `POST /analyze/batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub emails: Vec<EmailInput>,
}

/// Body of `POST /ai/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Free-form context from the caller (a string or any JSON value).
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

// Enums.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Map a free-form model label onto a priority.
    ///
    /// Anything unrecognized becomes the default (`medium`) rather than failing the analysis.
    pub fn coerce(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" | "高" => Priority::High,
            "low" | "低" => Priority::Low,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Map a free-form model label onto a sentiment, defaulting to `neutral`.
    pub fn coerce(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" | "积极" | "正面" => Sentiment::Positive,
            "negative" | "消极" | "负面" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

// Results.

/// The normalized analysis of one email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAnalysis {
    pub email_id: String,
    pub summary: String,
    pub priority: Priority,
    pub sentiment: Sentiment,
    pub suggested_reply: Option<String>,
    pub tags: Vec<String>,
    pub confidence: f64,
    pub key_points: Vec<String>,
    pub action_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub results: Vec<EmailAnalysis>,
    pub summary_stats: SummaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub priority_distribution: BTreeMap<Priority, usize>,
    pub sentiment_distribution: BTreeMap<Sentiment, usize>,
    pub action_required_count: usize,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplySuggestion {
    pub suggested_reply: String,
    pub tone: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub categories: Vec<String>,
    pub suggested_folder: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub priority: Priority,
    pub score: u32,
    pub factors: Vec<String>,
    pub recommendation: String,
}
