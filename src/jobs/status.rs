//! Job status records, written through the cache.
//!
//! Status lives under `job:{id}` in the realtime/frequent tiers rather
//! than a process-local map, so any worker (or a restarted one) serves
//! the same view a poller saw when the job ran elsewhere.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::report::{OwnerReport, SystemReport};
use crate::cache::{keys, CacheTier, TieredCache};
use crate::domain::{JobId, TrendResult};

/// Lifecycle of one background job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

/// Coarse progress within a running job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobProgress {
    pub stage: String,
    pub completed: usize,
    pub total: usize,
}

impl Default for JobProgress {
    fn default() -> Self {
        Self {
            stage: "queued".to_string(),
            completed: 0,
            total: 0,
        }
    }
}

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum JobOutcome {
    Trend(TrendResult),
    Bulk(OwnerReport),
    System(SystemReport),
}

/// The record a status poller reads.
///
/// `error` carries a human-readable message only; stack traces never
/// reach this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    pub state: JobState,
    pub progress: JobProgress,
    pub result: Option<JobOutcome>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobStatus {
    /// Read a job's status record from the cache.
    pub async fn load(cache: &TieredCache, job_id: &JobId) -> Option<Self> {
        cache.get(&keys::job(job_id), CacheTier::Frequent).await
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, JobState::Succeeded | JobState::Failed)
    }
}

/// Writes one job's state transitions through the cache.
pub struct JobTracker {
    id: JobId,
    cache: Arc<TieredCache>,
    progress: Mutex<JobProgress>,
}

impl JobTracker {
    pub fn new(id: JobId, cache: Arc<TieredCache>) -> Self {
        Self {
            id,
            cache,
            progress: Mutex::new(JobProgress::default()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub async fn queued(&self) {
        self.write(JobState::Queued, None, None).await;
    }

    pub async fn running(&self) {
        self.write(JobState::Running, None, None).await;
    }

    /// Record a progress milestone while running.
    pub async fn progress(&self, stage: &str, completed: usize, total: usize) {
        {
            let mut progress = self.progress.lock();
            progress.stage = stage.to_string();
            progress.completed = completed;
            progress.total = total;
        }
        self.write(JobState::Running, None, None).await;
    }

    pub async fn succeeded(&self, outcome: JobOutcome) {
        self.write(JobState::Succeeded, Some(outcome), None).await;
    }

    pub async fn failed(&self, error: String) {
        self.write(JobState::Failed, None, Some(error)).await;
    }

    async fn write(&self, state: JobState, result: Option<JobOutcome>, error: Option<String>) {
        let status = JobStatus {
            id: self.id.clone(),
            state,
            progress: self.progress.lock().clone(),
            result,
            error,
            updated_at: Utc::now(),
        };
        self.cache
            .put(&keys::job(&self.id), CacheTier::Frequent, &status)
            .await;
    }
}
