//! Store fakes with scripted failures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::domain::{Document, MetricSnapshot, OwnerId, Topic, TopicId};
use crate::error::{ComputationError, Error, Result, StorageError};
use crate::store::{MemoryStore, TrendStore};

/// Which error taxonomy a scripted failure should surface as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Storage,
    Computation,
}

/// A [`MemoryStore`] wrapper that fails on demand.
///
/// Seeding goes through the inner store; failures are scripted per topic
/// for document reads and globally for snapshot writes.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_documents: RwLock<HashMap<TopicId, (FailureKind, String)>>,
    fail_snapshot_writes: AtomicBool,
    snapshot_write_attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_topic(&self, topic: Topic) {
        self.inner.put_topic(topic);
    }

    pub fn put_document(&self, document: Document) {
        self.inner.put_document(document);
    }

    /// Make `list_documents` fail for one topic.
    pub fn fail_documents_for(&self, topic_id: &TopicId, kind: FailureKind, message: &str) {
        self.fail_documents
            .write()
            .insert(topic_id.clone(), (kind, message.to_string()));
    }

    /// Toggle failure of all snapshot writes.
    pub fn set_fail_snapshot_writes(&self, fail: bool) {
        self.fail_snapshot_writes.store(fail, Ordering::SeqCst);
    }

    /// How many snapshot writes were attempted, including failed ones.
    pub fn snapshot_write_attempts(&self) -> usize {
        self.snapshot_write_attempts.load(Ordering::SeqCst)
    }

    pub fn snapshot_count(&self, topic_id: &TopicId) -> usize {
        self.inner.snapshot_count(topic_id)
    }

    fn scripted_error(kind: FailureKind, message: &str) -> Error {
        match kind {
            FailureKind::Storage => StorageError::Read(message.to_string()).into(),
            FailureKind::Computation => ComputationError::Scorer(message.to_string()).into(),
        }
    }
}

impl TrendStore for FlakyStore {
    async fn find_topic(&self, topic_id: &TopicId, owner_id: &OwnerId) -> Result<Option<Topic>> {
        self.inner.find_topic(topic_id, owner_id).await
    }

    async fn list_documents(&self, topic_id: &TopicId) -> Result<Vec<Document>> {
        if let Some((kind, message)) = self.fail_documents.read().get(topic_id) {
            return Err(Self::scripted_error(*kind, message));
        }
        self.inner.list_documents(topic_id).await
    }

    async fn list_metric_history(
        &self,
        topic_id: &TopicId,
        limit: usize,
    ) -> Result<Vec<MetricSnapshot>> {
        self.inner.list_metric_history(topic_id, limit).await
    }

    async fn append_metric_snapshots(&self, snapshots: &[MetricSnapshot]) -> Result<()> {
        self.snapshot_write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_snapshot_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write("snapshot table unavailable".to_string()).into());
        }
        self.inner.append_metric_snapshots(snapshots).await
    }

    async fn list_active_topics(&self, owner_id: Option<&OwnerId>) -> Result<Vec<Topic>> {
        self.inner.list_active_topics(owner_id).await
    }
}
