//! Aggregated trend results and their building blocks.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DocumentId, TopicId};

/// Per-document scores produced by one aggregation pass.
///
/// Ephemeral: only the topic-level reduction is persisted or cached.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentScore {
    pub document_id: DocumentId,
    /// Term-importance weight, 0.0-1.0 within the batch.
    pub term_importance: f64,
    /// Blended engagement, 0.0-1.0 within the batch.
    pub engagement: f64,
    /// Lexicon sentiment, -1.0-1.0.
    pub sentiment: f64,
    /// Engagement growth rate, never negative.
    pub virality: f64,
}

/// One ranked vocabulary term with its corpus weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,
    pub weight: f64,
}

/// Classification of a topic's engagement trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Stable => "stable",
        };
        write!(f, "{label}")
    }
}

/// Document counts bucketed by engagement score.
///
/// Invariant: `total()` equals the number of documents aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngagementDistribution {
    /// Engagement below 0.33.
    pub low: usize,
    /// Engagement in [0.33, 0.67).
    pub medium: usize,
    /// Engagement at or above 0.67.
    pub high: usize,
}

/// Bucket boundary between low and medium engagement.
pub const ENGAGEMENT_LOW_BOUND: f64 = 0.33;
/// Bucket boundary between medium and high engagement.
pub const ENGAGEMENT_HIGH_BOUND: f64 = 0.67;

impl EngagementDistribution {
    /// Bucket a set of engagement scores.
    #[must_use]
    pub fn from_scores<'a>(scores: impl IntoIterator<Item = &'a f64>) -> Self {
        let mut dist = Self::default();
        for &score in scores {
            if score < ENGAGEMENT_LOW_BOUND {
                dist.low += 1;
            } else if score < ENGAGEMENT_HIGH_BOUND {
                dist.medium += 1;
            } else {
                dist.high += 1;
            }
        }
        dist
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// The full trend record for one topic, as served from the cache.
///
/// Entirely derivable from documents plus metric history, so it is always
/// safe to evict and recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub topic_id: TopicId,
    pub avg_term_importance: f64,
    pub avg_engagement: f64,
    pub avg_sentiment: f64,
    pub avg_virality: f64,
    pub velocity: f64,
    pub direction: TrendDirection,
    /// Trustworthiness of the averages given sample size and variance, 0.0-1.0.
    pub confidence: f64,
    pub total_documents: usize,
    pub top_terms: Vec<TermWeight>,
    pub engagement_distribution: EngagementDistribution,
    pub computed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TrendResult {
    /// The well-defined result for a topic with no documents.
    #[must_use]
    pub fn empty(topic_id: TopicId, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            topic_id,
            avg_term_importance: 0.0,
            avg_engagement: 0.0,
            avg_sentiment: 0.0,
            avg_virality: 0.0,
            velocity: 0.0,
            direction: TrendDirection::Stable,
            confidence: 0.0,
            total_documents: 0,
            top_terms: Vec::new(),
            engagement_distribution: EngagementDistribution::default(),
            computed_at: now,
            expires_at: now + ttl,
        }
    }
}
