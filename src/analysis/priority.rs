//! Rule-based priority scoring on top of the keyword classifier.

use crate::{
    analysis::classify::{GENERAL_CATEGORY, classify},
    base::types::{EmailInput, Priority, PriorityAssessment},
};

const BASE_SCORE: u32 = 50;

/// Score weight per classifier category.
const WEIGHTS: &[(&str, u32)] = &[("紧急", 30), ("工作", 20), ("财务", 15), ("通知", 10)];

/// Assess the priority of an email from its keyword categories.
pub fn assess_priority(email: &EmailInput) -> PriorityAssessment {
    let factors: Vec<String> = classify(email).categories.into_iter().filter(|c| c != GENERAL_CATEGORY).collect();

    let score = BASE_SCORE
        + WEIGHTS
            .iter()
            .filter(|(category, _)| factors.iter().any(|f| f == category))
            .map(|(_, weight)| weight)
            .sum::<u32>();

    let priority = match score {
        80.. => Priority::High,
        60.. => Priority::Medium,
        _ => Priority::Low,
    };

    PriorityAssessment {
        priority,
        score,
        factors,
        recommendation: recommendation(priority).to_string(),
    }
}

fn recommendation(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "建议立即处理，这封邮件可能包含重要信息",
        Priority::Medium => "建议在今天内处理",
        Priority::Low => "可以稍后处理，不是紧急邮件",
    }
}
