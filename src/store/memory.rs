//! In-memory store implementation for testing and embedding.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::TrendStore;
use crate::domain::{Document, MetricSnapshot, OwnerId, Topic, TopicId};
use crate::error::Result;

/// In-memory store backed by locked maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    topics: RwLock<HashMap<TopicId, Topic>>,
    documents: RwLock<HashMap<TopicId, Vec<Document>>>,
    snapshots: RwLock<HashMap<TopicId, Vec<MetricSnapshot>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a topic.
    pub fn put_topic(&self, topic: Topic) {
        self.topics.write().insert(topic.id.clone(), topic);
    }

    /// Append a document under its topic.
    pub fn put_document(&self, document: Document) {
        self.documents
            .write()
            .entry(document.topic_id.clone())
            .or_default()
            .push(document);
    }

    /// Total stored snapshot rows for a topic.
    #[must_use]
    pub fn snapshot_count(&self, topic_id: &TopicId) -> usize {
        self.snapshots
            .read()
            .get(topic_id)
            .map_or(0, Vec::len)
    }
}

impl TrendStore for MemoryStore {
    async fn find_topic(&self, topic_id: &TopicId, owner_id: &OwnerId) -> Result<Option<Topic>> {
        let topics = self.topics.read();
        Ok(topics
            .get(topic_id)
            .filter(|topic| &topic.owner_id == owner_id)
            .cloned())
    }

    async fn list_documents(&self, topic_id: &TopicId) -> Result<Vec<Document>> {
        Ok(self
            .documents
            .read()
            .get(topic_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_metric_history(
        &self,
        topic_id: &TopicId,
        limit: usize,
    ) -> Result<Vec<MetricSnapshot>> {
        let snapshots = self.snapshots.read();
        let rows = snapshots.get(topic_id).map_or(&[][..], Vec::as_slice);
        let start = rows.len().saturating_sub(limit);
        Ok(rows[start..].to_vec())
    }

    async fn append_metric_snapshots(&self, snapshots: &[MetricSnapshot]) -> Result<()> {
        let mut store = self.snapshots.write();
        for snapshot in snapshots {
            store
                .entry(snapshot.topic_id.clone())
                .or_default()
                .push(snapshot.clone());
        }
        Ok(())
    }

    async fn list_active_topics(&self, owner_id: Option<&OwnerId>) -> Result<Vec<Topic>> {
        let topics = self.topics.read();
        let mut active: Vec<Topic> = topics
            .values()
            .filter(|topic| topic.active)
            .filter(|topic| owner_id.map_or(true, |owner| &topic.owner_id == owner))
            .cloned()
            .collect();
        active.sort_by(|a, b| (&a.owner_id, &a.id).cmp(&(&b.owner_id, &b.id)));
        Ok(active)
    }
}
