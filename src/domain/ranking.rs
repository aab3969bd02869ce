//! Cross-topic importance ranking entries.

use serde::{Deserialize, Serialize};

use super::id::TopicId;

/// One topic's position in an owner's importance ranking.
///
/// Derived on demand from cached trend results; never persisted. The only
/// invariant is the ordering of the list it belongs to: descending
/// importance, ties broken by topic id ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub topic_id: TopicId,
    pub importance: f64,
    pub avg_term_importance: f64,
    pub avg_engagement: f64,
    pub velocity: f64,
}
