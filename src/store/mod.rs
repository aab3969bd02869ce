//! Persistence port for topics, documents, and metric history.
//!
//! The relational implementation lives with the surrounding application;
//! the core consumes this trait and ships an in-memory adapter for tests
//! and embedding.

use std::future::Future;

use crate::domain::{Document, MetricSnapshot, OwnerId, Topic, TopicId};
use crate::error::Result;

mod memory;

pub use memory::MemoryStore;

/// Read/append operations the trend core needs from storage.
///
/// Implementations must be safe under concurrent access; the core never
/// coordinates store calls across jobs.
pub trait TrendStore: Send + Sync {
    /// Look up a topic, scoped to its owner.
    ///
    /// `None` covers both "no such topic" and "owned by someone else" -
    /// the ownership check is storage's responsibility.
    fn find_topic(
        &self,
        topic_id: &TopicId,
        owner_id: &OwnerId,
    ) -> impl Future<Output = Result<Option<Topic>>> + Send;

    /// Current documents for a topic.
    fn list_documents(&self, topic_id: &TopicId)
        -> impl Future<Output = Result<Vec<Document>>> + Send;

    /// Metric history for a topic, oldest to newest, at most `limit` rows.
    fn list_metric_history(
        &self,
        topic_id: &TopicId,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<MetricSnapshot>>> + Send;

    /// Append one analysis run's snapshot rows.
    fn append_metric_snapshots(
        &self,
        snapshots: &[MetricSnapshot],
    ) -> impl Future<Output = Result<()>> + Send;

    /// All active topics, optionally restricted to one owner.
    fn list_active_topics(
        &self,
        owner_id: Option<&OwnerId>,
    ) -> impl Future<Output = Result<Vec<Topic>>> + Send;
}
