//! Cross-topic importance ranking.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::ImportanceWeights;
use crate::domain::{OwnerId, RankingEntry, TrendResult};

/// Ranks an owner's topics by blended importance.
#[derive(Debug, Clone)]
pub struct ImportanceRanker {
    weights: ImportanceWeights,
}

impl ImportanceRanker {
    #[must_use]
    pub fn new(weights: ImportanceWeights) -> Self {
        Self { weights }
    }

    /// Importance for one topic's aggregated result.
    ///
    /// Velocity enters as magnitude: a sharply falling topic is as worth
    /// surfacing as a sharply rising one.
    #[must_use]
    pub fn importance(&self, result: &TrendResult) -> f64 {
        self.weights.term_importance * result.avg_term_importance
            + self.weights.engagement * result.avg_engagement
            + self.weights.velocity * result.velocity.abs()
    }

    /// Rank the given results, descending by importance.
    ///
    /// Ties break by topic id ascending, keeping the order deterministic.
    /// Topics whose computation failed simply don't appear in `results`;
    /// the ranking is over whatever survived.
    #[must_use]
    pub fn rank(&self, owner_id: &OwnerId, results: &[TrendResult]) -> Vec<RankingEntry> {
        let mut entries: Vec<RankingEntry> = results
            .iter()
            .map(|result| RankingEntry {
                topic_id: result.topic_id.clone(),
                importance: self.importance(result),
                avg_term_importance: result.avg_term_importance,
                avg_engagement: result.avg_engagement,
                velocity: result.velocity,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.importance
                .partial_cmp(&a.importance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.topic_id.cmp(&b.topic_id))
        });

        debug!(owner = %owner_id, topics = entries.len(), "Ranked topics");
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TopicId, TrendResult};

    fn result(topic: &str, term: f64, engagement: f64, velocity: f64) -> TrendResult {
        let mut r = TrendResult::empty(TopicId::new(topic), chrono::Duration::hours(1));
        r.avg_term_importance = term;
        r.avg_engagement = engagement;
        r.velocity = velocity;
        r
    }

    fn ranker() -> ImportanceRanker {
        ImportanceRanker::new(ImportanceWeights::default())
    }

    #[test]
    fn importance_blends_with_default_weights() {
        let r = result("t1", 0.5, 0.5, -2.0);
        // 0.4*0.5 + 0.4*0.5 + 0.2*2.0 = 0.8
        assert!((ranker().importance(&r) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn velocity_contributes_by_magnitude() {
        let rising = result("t1", 0.0, 0.0, 1.5);
        let falling = result("t2", 0.0, 0.0, -1.5);
        let ranker = ranker();
        assert!((ranker.importance(&rising) - ranker.importance(&falling)).abs() < f64::EPSILON);
    }

    #[test]
    fn rank_orders_descending_by_importance() {
        // Importances: a=0.8, b=0.95, c=0.2 (engagement-only results).
        let results = vec![
            result("topic_a", 1.0, 1.0, 0.0),  // 0.8
            result("topic_b", 1.0, 1.0, 0.75), // 0.95
            result("topic_c", 0.25, 0.25, 0.0), // 0.2
        ];
        let ranked = ranker().rank(&OwnerId::new("o1"), &results);

        let order: Vec<&str> = ranked.iter().map(|e| e.topic_id.as_str()).collect();
        assert_eq!(order, vec!["topic_b", "topic_a", "topic_c"]);
        assert!((ranked[0].importance - 0.95).abs() < 1e-12);
    }

    #[test]
    fn ties_break_by_topic_id_ascending() {
        let results = vec![
            result("zeta", 0.5, 0.5, 0.0),
            result("alpha", 0.5, 0.5, 0.0),
        ];
        let ranked = ranker().rank(&OwnerId::new("o1"), &results);
        assert_eq!(ranked[0].topic_id.as_str(), "alpha");
        assert_eq!(ranked[1].topic_id.as_str(), "zeta");
    }

    #[test]
    fn empty_results_rank_to_empty_list() {
        assert!(ranker().rank(&OwnerId::new("o1"), &[]).is_empty());
    }

    #[test]
    fn custom_weights_change_ordering() {
        let weights = ImportanceWeights {
            term_importance: 0.0,
            engagement: 0.0,
            velocity: 1.0,
        };
        let results = vec![
            result("steady", 1.0, 1.0, 0.0),
            result("mover", 0.0, 0.0, 3.0),
        ];
        let ranked = ImportanceRanker::new(weights).rank(&OwnerId::new("o1"), &results);
        assert_eq!(ranked[0].topic_id.as_str(), "mover");
    }
}
