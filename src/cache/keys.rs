//! Logical cache key builders.
//!
//! All shared state flows through the cache under these key shapes, so the
//! invalidation patterns in one place stay in sync with the writers.

use crate::domain::{JobId, OwnerId, TopicId};

/// Trend result for one topic: `trend:{owner}:{topic}`.
#[must_use]
pub fn trend(owner_id: &OwnerId, topic_id: &TopicId) -> String {
    format!("trend:{owner_id}:{topic_id}")
}

/// All cached trends for one topic, regardless of owner key segment.
#[must_use]
pub fn trend_topic_pattern(topic_id: &TopicId) -> String {
    format!("trend:*:{topic_id}")
}

/// All cached trends for one owner.
#[must_use]
pub fn trend_owner_pattern(owner_id: &OwnerId) -> String {
    format!("trend:{owner_id}:*")
}

/// Importance ranking for one owner: `ranking:{owner}`.
#[must_use]
pub fn ranking(owner_id: &OwnerId) -> String {
    format!("ranking:{owner_id}")
}

/// Job status record: `job:{id}`.
#[must_use]
pub fn job(job_id: &JobId) -> String {
    format!("job:{job_id}")
}

/// Advisory analysis lease for one topic.
#[must_use]
pub fn lease(topic_id: &TopicId) -> String {
    format!("lease:analyze:{topic_id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::pattern::key_matches;

    #[test]
    fn topic_pattern_matches_trend_keys_for_any_owner() {
        let key = trend(&OwnerId::new("o1"), &TopicId::new("t9"));
        assert!(key_matches(&trend_topic_pattern(&TopicId::new("t9")), &key));
        assert!(!key_matches(&trend_topic_pattern(&TopicId::new("t1")), &key));
    }

    #[test]
    fn owner_pattern_matches_all_owner_trends() {
        let owner = OwnerId::new("o1");
        let key = trend(&owner, &TopicId::new("anything"));
        assert!(key_matches(&trend_owner_pattern(&owner), &key));
        assert!(!key_matches(&trend_owner_pattern(&OwnerId::new("o2")), &key));
    }
}
