//! Normalized engagement scoring from raw popularity and reply counters.

use std::collections::HashMap;

use crate::config::EngagementWeights;
use crate::domain::{Document, DocumentId};

/// Blends batch-normalized popularity and reply counts into one score.
#[derive(Debug, Clone)]
pub struct EngagementScorer {
    weights: EngagementWeights,
}

impl EngagementScorer {
    #[must_use]
    pub fn new(weights: EngagementWeights) -> Self {
        Self { weights }
    }

    /// Score every document in the batch, 0.0-1.0.
    ///
    /// Each counter is normalized by the batch maximum (0 when the batch
    /// maximum is 0), then blended with the configured weights. An empty
    /// batch yields an empty map.
    #[must_use]
    pub fn score(&self, documents: &[Document]) -> HashMap<DocumentId, f64> {
        if documents.is_empty() {
            return HashMap::new();
        }

        let max_popularity = documents.iter().map(|d| d.popularity).max().unwrap_or(0);
        let max_replies = documents.iter().map(|d| d.replies).max().unwrap_or(0);

        documents
            .iter()
            .map(|doc| {
                let popularity = normalize(doc.popularity, max_popularity);
                let replies = normalize(doc.replies, max_replies);
                let score = self.weights.popularity * popularity + self.weights.replies * replies;
                (doc.id.clone(), score)
            })
            .collect()
    }
}

fn normalize(value: u64, max: u64) -> f64 {
    if max == 0 {
        0.0
    } else {
        value as f64 / max as f64
    }
}
