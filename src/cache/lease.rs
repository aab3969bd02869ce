//! Advisory per-topic analysis lease.
//!
//! Approximates "at most one concurrent analysis per topic" with a
//! short-TTL cache key instead of a hard lock: a crashed holder simply
//! expires. Advisory means a backend outage never blocks analysis - when
//! the lease cannot be checked, callers proceed.

use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::CacheBackend;
use super::keys;
use crate::domain::TopicId;

pub struct AnalysisLease {
    backend: Arc<dyn CacheBackend>,
    ttl: chrono::Duration,
}

impl AnalysisLease {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: chrono::Duration) -> Self {
        Self { backend, ttl }
    }

    /// Try to acquire the lease for a topic.
    ///
    /// Returns `false` only when another holder provably owns it; backend
    /// errors grant the lease.
    pub async fn acquire(&self, topic_id: &TopicId) -> bool {
        let key = keys::lease(topic_id);
        match self.backend.set_if_absent(&key, "held", self.ttl).await {
            Ok(acquired) => {
                debug!(topic = %topic_id, acquired, "Analysis lease attempt");
                acquired
            }
            Err(e) => {
                warn!(topic = %topic_id, error = %e, "Lease check failed, proceeding without it");
                true
            }
        }
    }

    /// Release the lease early; expiry covers holders that never release.
    pub async fn release(&self, topic_id: &TopicId) {
        let key = keys::lease(topic_id);
        if let Err(e) = self.backend.delete(&key).await {
            warn!(topic = %topic_id, error = %e, "Failed to release analysis lease");
        }
    }
}
