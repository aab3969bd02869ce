//! Append-only metric history rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DocumentId, TopicId};

/// One metric row per document per analysis run.
///
/// Appended by the aggregator on every run and never mutated. All rows of
/// one run share the same `recorded_at`, which is what groups history back
/// into per-run averages for velocity and virality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub topic_id: TopicId,
    pub document_id: DocumentId,
    pub engagement: f64,
    pub term_importance: f64,
    pub velocity: f64,
    pub sentiment: f64,
    pub virality: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Reduce a time-ordered snapshot history to per-run engagement averages.
///
/// `history` must be ordered oldest to newest; rows with the same
/// `recorded_at` belong to the same run. Returns one average per run,
/// oldest first.
#[must_use]
pub fn run_engagement_averages(history: &[MetricSnapshot]) -> Vec<f64> {
    let mut averages = Vec::new();
    let mut run_start = 0;

    while run_start < history.len() {
        let stamp = history[run_start].recorded_at;
        let mut run_end = run_start;
        while run_end < history.len() && history[run_end].recorded_at == stamp {
            run_end += 1;
        }
        let sum: f64 = history[run_start..run_end].iter().map(|s| s.engagement).sum();
        averages.push(sum / (run_end - run_start) as f64);
        run_start = run_end;
    }

    averages
}
