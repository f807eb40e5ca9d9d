//! Concurrent batch analysis and aggregation.

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{info, instrument};

use crate::{
    analysis::email::analyze_email,
    base::{
        config::Config,
        types::{BatchResult, EmailAnalysis, EmailInput, Priority, Sentiment, SummaryStats},
    },
    service::llm::LlmClient,
};

/// Analyse every email concurrently and aggregate the results.
///
/// `results` follows input order regardless of completion order. A failed item still
/// yields a (fallback) analysis, so the batch as a whole cannot fail.
#[instrument(skip_all, fields(count = emails.len()))]
pub async fn analyze_batch(llm: &LlmClient, config: &Config, emails: &[EmailInput]) -> BatchResult {
    let results = join_all(emails.iter().map(|email| analyze_email(llm, config, email))).await;

    let summary_stats = summarize(&results);

    info!("Batch of {} analysed, {} need action", summary_stats.total, summary_stats.action_required_count);

    BatchResult { results, summary_stats }
}

/// Compute the summary counters for a set of analyses.
pub fn summarize(results: &[EmailAnalysis]) -> SummaryStats {
    let mut priority_distribution: BTreeMap<Priority, usize> = Priority::ALL.iter().map(|p| (*p, 0)).collect();
    let mut sentiment_distribution: BTreeMap<Sentiment, usize> = Sentiment::ALL.iter().map(|s| (*s, 0)).collect();

    for result in results {
        *priority_distribution.entry(result.priority).or_default() += 1;
        *sentiment_distribution.entry(result.sentiment).or_default() += 1;
    }

    let avg_confidence = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64
    };

    SummaryStats {
        total: results.len(),
        priority_distribution,
        sentiment_distribution,
        action_required_count: results.iter().filter(|r| r.action_required).count(),
        avg_confidence,
    }
}
