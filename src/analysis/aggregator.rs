//! Topic-level aggregation of per-document scores.
//!
//! One `aggregate` pass reduces a topic's current documents and metric
//! history into a [`TrendResult`], appends this run's snapshot rows, and
//! writes the result through the tiered cache. Snapshot and cache write
//! failures degrade (logged, result still returned); only scoring itself
//! can fail the pass.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::cache::{keys, CacheTier, TieredCache};
use crate::config::{Config, TrendConfig};
use crate::domain::{
    run_engagement_averages, Document, DocumentScore, EngagementDistribution, MetricSnapshot,
    Topic, TrendDirection, TrendResult,
};
use crate::error::{ComputationError, Result};
use crate::scoring::{sentiment_score, virality_score, EngagementScorer, TextScorer};
use crate::store::TrendStore;

/// Sample-size saturation constant for confidence: at this many documents
/// confidence reaches half of its variance-limited ceiling.
const CONFIDENCE_SATURATION: f64 = 10.0;

/// Velocity of engagement across analysis history.
///
/// `runs` holds per-run engagement averages oldest to newest, including
/// the current run. The history splits into halves by index; velocity is
/// the mean shift between halves scaled by history length.
#[must_use]
pub fn velocity_from_runs(runs: &[f64]) -> f64 {
    if runs.len() < 2 {
        return 0.0;
    }
    let mid = runs.len() / 2;
    let older = mean(&runs[..mid]);
    let recent = mean(&runs[mid..]);
    (recent - older) / runs.len() as f64 * 100.0
}

/// Classify a velocity against the configured thresholds.
///
/// Both comparisons are strict: a velocity sitting exactly on a threshold
/// is stable.
#[must_use]
pub fn classify_direction(velocity: f64, config: &TrendConfig) -> TrendDirection {
    if velocity > config.rising_threshold {
        TrendDirection::Rising
    } else if velocity < config.falling_threshold {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    }
}

/// Confidence in aggregated metrics given sample size and score variance.
///
/// Monotonic non-decreasing in `samples` for fixed variance, monotonic
/// non-increasing in variance for fixed `samples`; always within [0, 1].
#[must_use]
pub fn confidence_score(samples: usize, variance: f64) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    let n = samples as f64;
    let sample_factor = n / (n + CONFIDENCE_SATURATION);
    let stability_factor = 1.0 / (1.0 + variance.max(0.0));
    (sample_factor * stability_factor).clamp(0.0, 1.0)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64
}

/// Reduces documents plus history into cached topic trend results.
pub struct TrendAggregator<S> {
    store: Arc<S>,
    cache: Arc<TieredCache>,
    text_scorer: TextScorer,
    engagement_scorer: EngagementScorer,
    trend: TrendConfig,
}

impl<S: TrendStore> TrendAggregator<S> {
    pub fn new(store: Arc<S>, cache: Arc<TieredCache>, config: &Config) -> Self {
        Self {
            store,
            cache,
            text_scorer: TextScorer::new(config.text),
            engagement_scorer: EngagementScorer::new(config.engagement),
            trend: config.trend,
        }
    }

    /// Aggregate one topic's current documents against its metric history.
    ///
    /// `history` must be ordered oldest to newest. Deterministic over its
    /// inputs apart from timestamps.
    pub async fn aggregate(
        &self,
        topic: &Topic,
        documents: &[Document],
        history: &[MetricSnapshot],
    ) -> Result<TrendResult> {
        let cache_key = keys::trend(&topic.owner_id, &topic.id);
        let ttl = self.cache.tier_ttl(CacheTier::Stable);

        if documents.is_empty() {
            let result = TrendResult::empty(topic.id.clone(), ttl);
            self.cache.put(&cache_key, CacheTier::Stable, &result).await;
            return Ok(result);
        }

        let text = self.text_scorer.score(documents);
        let engagement = self.engagement_scorer.score(documents);
        let virality = virality_score(history);

        let scores: Vec<DocumentScore> = documents
            .iter()
            .map(|doc| DocumentScore {
                document_id: doc.id.clone(),
                term_importance: text.by_document.get(&doc.id).copied().unwrap_or(0.0),
                engagement: engagement.get(&doc.id).copied().unwrap_or(0.0),
                sentiment: sentiment_score(&doc.content),
                virality,
            })
            .collect();

        let engagement_values: Vec<f64> = scores.iter().map(|s| s.engagement).collect();
        let avg_term_importance = mean(&scores.iter().map(|s| s.term_importance).collect::<Vec<_>>());
        let avg_engagement = mean(&engagement_values);
        let avg_sentiment = mean(&scores.iter().map(|s| s.sentiment).collect::<Vec<_>>());
        let avg_virality = mean(&scores.iter().map(|s| s.virality).collect::<Vec<_>>());

        let mut runs = run_engagement_averages(history);
        runs.push(avg_engagement);
        let velocity = velocity_from_runs(&runs);
        let direction = classify_direction(velocity, &self.trend);
        let confidence = confidence_score(scores.len(), population_variance(&engagement_values));

        for value in [
            avg_term_importance,
            avg_engagement,
            avg_sentiment,
            avg_virality,
            velocity,
        ] {
            if !value.is_finite() {
                return Err(ComputationError::NonFiniteScore {
                    topic_id: topic.id.to_string(),
                }
                .into());
            }
        }

        let computed_at = Utc::now();
        let result = TrendResult {
            topic_id: topic.id.clone(),
            avg_term_importance,
            avg_engagement,
            avg_sentiment,
            avg_virality,
            velocity,
            direction,
            confidence,
            total_documents: scores.len(),
            top_terms: text.top_terms,
            engagement_distribution: EngagementDistribution::from_scores(&engagement_values),
            computed_at,
            expires_at: computed_at + ttl,
        };

        let snapshots: Vec<MetricSnapshot> = scores
            .iter()
            .map(|score| MetricSnapshot {
                topic_id: topic.id.clone(),
                document_id: score.document_id.clone(),
                engagement: score.engagement,
                term_importance: score.term_importance,
                velocity,
                sentiment: score.sentiment,
                virality: score.virality,
                recorded_at: computed_at,
            })
            .collect();
        if let Err(e) = self.store.append_metric_snapshots(&snapshots).await {
            warn!(topic = %topic.id, error = %e, "Failed to persist metric snapshots, continuing");
        }

        self.cache.put(&cache_key, CacheTier::Stable, &result).await;

        debug!(
            topic = %topic.id,
            documents = result.total_documents,
            velocity,
            direction = %direction,
            "Topic aggregated"
        );
        Ok(result)
    }

    /// The history depth the aggregator expects from storage.
    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.trend.history_limit
    }
}
