//! Topics and the documents collected under them.
//!
//! Both records are owned by external collaborators (topic CRUD and the
//! ingestion pipeline); the core only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{DocumentId, OwnerId, TopicId};

/// A user-tracked subject whose documents are analyzed for trends.
///
/// Belongs to exactly one owner. Inactive topics are skipped by bulk and
/// scheduled analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub owner_id: OwnerId,
    pub text: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    pub fn new(id: impl Into<TopicId>, owner_id: impl Into<OwnerId>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            text: text.into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One unit of text content with engagement counters.
///
/// Immutable once created; the counters are raw totals captured at
/// ingestion time, not rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub topic_id: TopicId,
    pub content: String,
    pub popularity: u64,
    pub replies: u64,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        id: impl Into<DocumentId>,
        topic_id: impl Into<TopicId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            topic_id: topic_id.into(),
            content: content.into(),
            popularity: 0,
            replies: 0,
            created_at: Utc::now(),
        }
    }

    /// Builder-style setter for engagement counters.
    #[must_use]
    pub fn with_engagement(mut self, popularity: u64, replies: u64) -> Self {
        self.popularity = popularity;
        self.replies = replies;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_topic_is_active() {
        let topic = Topic::new("t1", "o1", "rust async runtimes");
        assert!(topic.active);
        assert_eq!(topic.owner_id.as_str(), "o1");
    }

    #[test]
    fn document_with_engagement_sets_counters() {
        let doc = Document::new("d1", "t1", "hello").with_engagement(10, 3);
        assert_eq!(doc.popularity, 10);
        assert_eq!(doc.replies, 3);
    }
}
