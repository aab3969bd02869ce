//! Background analysis jobs: single topic, per owner, and system-wide.
//!
//! Bulk runs fan each topic out as an independent unit of work behind a
//! concurrency cap; outcomes are reduced by the job owner only after every
//! unit finished or failed. The whole pipeline is idempotent, so
//! at-least-once delivery from the surrounding task queue is safe:
//! re-running a topic appends another snapshot batch and overwrites the
//! cached result.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::report::{OwnerReport, SystemReport, TopicOutcome, TopicReport};
use super::status::{JobOutcome, JobStatus, JobTracker};
use crate::analysis::TrendAggregator;
use crate::cache::{keys, AnalysisLease, CacheTier, TieredCache};
use crate::config::Config;
use crate::domain::{JobId, OwnerId, Topic, TopicId, TrendResult};
use crate::error::{InputError, Result};
use crate::store::TrendStore;

/// Runs topic analysis as foreground calls or detached jobs.
pub struct JobOrchestrator<S> {
    store: Arc<S>,
    cache: Arc<TieredCache>,
    aggregator: Arc<TrendAggregator<S>>,
    lease: Option<Arc<AnalysisLease>>,
    concurrency: usize,
}

impl<S> Clone for JobOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            aggregator: Arc::clone(&self.aggregator),
            lease: self.lease.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<S: TrendStore + 'static> JobOrchestrator<S> {
    pub fn new(store: Arc<S>, cache: Arc<TieredCache>, config: &Config) -> Self {
        let aggregator = Arc::new(TrendAggregator::new(
            Arc::clone(&store),
            Arc::clone(&cache),
            config,
        ));
        let lease = config.cache.lease_enabled.then(|| {
            Arc::new(AnalysisLease::new(
                cache.backend(),
                chrono::Duration::seconds(config.cache.lease_ttl_secs as i64),
            ))
        });
        Self {
            store,
            cache,
            aggregator,
            lease,
            concurrency: config.jobs.effective_concurrency(),
        }
    }

    /// Analyze one topic and return the fresh result.
    ///
    /// Ownership is checked through storage; a missing or mismatched topic
    /// is an input error. With the advisory lease enabled, losing the race
    /// returns the cached result when one exists instead of recomputing.
    pub async fn analyze_one(
        &self,
        topic_id: &TopicId,
        owner_id: &OwnerId,
        tracker: Option<&JobTracker>,
    ) -> Result<TrendResult> {
        let topic = self
            .store
            .find_topic(topic_id, owner_id)
            .await?
            .ok_or_else(|| InputError::TopicNotFound {
                topic_id: topic_id.to_string(),
                owner_id: owner_id.to_string(),
            })?;

        let mut lease_held = false;
        if let Some(lease) = &self.lease {
            if lease.acquire(topic_id).await {
                lease_held = true;
            } else {
                debug!(topic = %topic_id, "Analysis lease held elsewhere");
                let cached: Option<TrendResult> = self
                    .cache
                    .get(&keys::trend(owner_id, topic_id), CacheTier::Stable)
                    .await;
                if let Some(result) = cached {
                    return Ok(result);
                }
                // Nothing cached to serve; the lease is advisory, so run anyway.
            }
        }

        let result = self.run_analysis(&topic, tracker).await;

        if lease_held {
            if let Some(lease) = &self.lease {
                lease.release(topic_id).await;
            }
        }
        result
    }

    async fn run_analysis(&self, topic: &Topic, tracker: Option<&JobTracker>) -> Result<TrendResult> {
        if let Some(t) = tracker {
            t.progress("fetching documents", 0, 3).await;
        }
        let documents = self.store.list_documents(&topic.id).await?;
        let history = self
            .store
            .list_metric_history(&topic.id, self.aggregator.history_limit())
            .await?;
        if let Some(t) = tracker {
            t.progress("scoring documents", 1, 3).await;
        }

        let result = self.aggregator.aggregate(topic, &documents, &history).await?;

        if let Some(t) = tracker {
            t.progress("persisted", 3, 3).await;
        }
        Ok(result)
    }

    /// Analyze every active topic belonging to one owner.
    ///
    /// An owner with no active topics gets an explicit empty report. One
    /// topic's failure never aborts the batch; the report itemizes every
    /// outcome. `cancel` is checked between per-topic units, never
    /// mid-scoring.
    pub async fn analyze_all_for_owner(
        &self,
        owner_id: &OwnerId,
        cancel: Option<watch::Receiver<bool>>,
        tracker: Option<&JobTracker>,
    ) -> Result<OwnerReport> {
        if owner_id.as_str().is_empty() {
            return Err(InputError::EmptyOwner.into());
        }
        let topics = self.store.list_active_topics(Some(owner_id)).await?;
        if topics.is_empty() {
            info!(owner = %owner_id, "No active topics to analyze");
            return Ok(OwnerReport::empty(owner_id.clone()));
        }
        Ok(self.run_batch(owner_id, topics, cancel, tracker).await)
    }

    /// Analyze every active topic for every owner, grouped by owner.
    ///
    /// Intended for the scheduler; shares the bulk isolation semantics of
    /// the per-owner run.
    pub async fn analyze_all_system_wide(
        &self,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<SystemReport> {
        let topics = self.store.list_active_topics(None).await?;
        if topics.is_empty() {
            return Ok(SystemReport::default());
        }

        let mut by_owner: BTreeMap<OwnerId, Vec<Topic>> = BTreeMap::new();
        for topic in topics {
            by_owner.entry(topic.owner_id.clone()).or_default().push(topic);
        }

        let mut owners = Vec::new();
        for (owner_id, owner_topics) in by_owner {
            if cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
                info!("System-wide analysis cancelled between owners");
                break;
            }
            let report = self
                .run_batch(&owner_id, owner_topics, cancel.clone(), None)
                .await;
            owners.push(report);
        }
        Ok(SystemReport::from_owners(owners))
    }

    /// Fan a batch of topics out behind the concurrency cap and reduce the
    /// outcomes once all units are done.
    async fn run_batch(
        &self,
        owner_id: &OwnerId,
        topics: Vec<Topic>,
        cancel: Option<watch::Receiver<bool>>,
        tracker: Option<&JobTracker>,
    ) -> OwnerReport {
        let total = topics.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let mut cancelled = false;

        for topic in topics {
            if cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
                info!(owner = %owner_id, "Bulk analysis cancelled, skipping remaining topics");
                cancelled = true;
                break;
            }
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let orchestrator = self.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let outcome = match orchestrator
                    .analyze_one(&topic.id, &topic.owner_id, None)
                    .await
                {
                    Ok(result) => TopicOutcome::Succeeded(result),
                    Err(e) => {
                        warn!(topic = %topic.id, error = %e, "Topic analysis failed");
                        TopicOutcome::Failed {
                            error: e.sanitized(),
                        }
                    }
                };
                TopicReport {
                    topic_id: topic.id,
                    outcome,
                }
            });
        }

        let mut reports = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => {
                    if let Some(t) = tracker {
                        t.progress("analyzing topics", reports.len() + 1, total).await;
                    }
                    reports.push(report);
                }
                Err(e) => warn!(owner = %owner_id, error = %e, "Analysis task aborted"),
            }
        }
        reports.sort_by(|a, b| a.topic_id.cmp(&b.topic_id));

        let report = OwnerReport::from_reports(owner_id.clone(), reports, cancelled);
        info!(
            owner = %owner_id,
            succeeded = report.succeeded,
            failed = report.failed,
            "Bulk analysis complete"
        );
        report
    }

    /// Queue a detached single-topic analysis job.
    ///
    /// The returned id can be polled via [`JobOrchestrator::job_status`];
    /// the queued record is visible before this returns.
    pub async fn submit_analyze_job(&self, topic_id: TopicId, owner_id: OwnerId) -> JobId {
        let tracker = JobTracker::new(JobId::new(), Arc::clone(&self.cache));
        let job_id = tracker.id().clone();
        tracker.queued().await;

        let orchestrator = self.clone();
        tokio::spawn(async move {
            tracker.running().await;
            match orchestrator
                .analyze_one(&topic_id, &owner_id, Some(&tracker))
                .await
            {
                Ok(result) => tracker.succeeded(JobOutcome::Trend(result)).await,
                Err(e) => tracker.failed(e.sanitized()).await,
            }
        });
        job_id
    }

    /// Queue a detached bulk job for one owner.
    pub async fn submit_bulk_job(&self, owner_id: OwnerId) -> JobId {
        let tracker = JobTracker::new(JobId::new(), Arc::clone(&self.cache));
        let job_id = tracker.id().clone();
        tracker.queued().await;

        let orchestrator = self.clone();
        tokio::spawn(async move {
            tracker.running().await;
            match orchestrator
                .analyze_all_for_owner(&owner_id, None, Some(&tracker))
                .await
            {
                Ok(report) => tracker.succeeded(JobOutcome::Bulk(report)).await,
                Err(e) => tracker.failed(e.sanitized()).await,
            }
        });
        job_id
    }

    /// Current status of a submitted job.
    pub async fn job_status(&self, job_id: &JobId) -> Result<JobStatus> {
        JobStatus::load(&self.cache, job_id)
            .await
            .ok_or_else(|| {
                InputError::JobNotFound {
                    job_id: job_id.to_string(),
                }
                .into()
            })
    }
}
