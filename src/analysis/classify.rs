//! Keyword-based folder classification. No model call is involved.

use crate::base::types::{Classification, EmailInput};

/// Category used when no keyword set matches.
pub const GENERAL_CATEGORY: &str = "一般";

/// Keyword sets, checked in this order. Keywords are lower-case literals.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("工作", &["会议", "meeting", "项目", "project", "报告", "report", "任务", "deadline"]),
    ("通知", &["通知", "notification", "提醒", "reminder", "公告", "announcement"]),
    ("紧急", &["紧急", "urgent", "重要", "important", "asap", "立即"]),
    ("财务", &["财务", "finance", "报销", "发票", "invoice", "付款", "payment", "账单"]),
];

/// Classify an email by substring membership over its subject and content.
///
/// An email may match several categories; they are reported in check order.
pub fn classify(email: &EmailInput) -> Classification {
    let text = format!("{} {}", email.subject, email.content).to_lowercase();

    let mut categories: Vec<String> = CATEGORIES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(name, _)| name.to_string())
        .collect();

    // A single match is more trustworthy than either no match or an ambiguous one.
    let confidence = if categories.len() == 1 { 0.8 } else { 0.6 };

    if categories.is_empty() {
        categories.push(GENERAL_CATEGORY.to_string());
    }

    Classification {
        suggested_folder: categories[0].clone(),
        categories,
        confidence,
    }
}
