//! The surface consumed by the API layer and job-status pollers.
//!
//! Everything here serves from the tiered cache unless a caller forces a
//! refresh; computation happens through the job orchestrator so foreground
//! reads and background jobs share one code path.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::warn;

use crate::analysis::ImportanceRanker;
use crate::cache::{keys, CacheTier, TieredCache};
use crate::config::Config;
use crate::domain::{JobId, OwnerId, RankingEntry, TopicId, TrendResult};
use crate::error::{InputError, Result};
use crate::jobs::{JobOrchestrator, JobStatus};
use crate::store::TrendStore;

/// Cache-served trend results, rankings, and job submission.
pub struct TrendService<S> {
    store: Arc<S>,
    cache: Arc<TieredCache>,
    orchestrator: JobOrchestrator<S>,
    ranker: ImportanceRanker,
}

impl<S: TrendStore + 'static> TrendService<S> {
    pub fn new(store: Arc<S>, cache: Arc<TieredCache>, config: &Config) -> Self {
        let orchestrator = JobOrchestrator::new(Arc::clone(&store), Arc::clone(&cache), config);
        Self {
            store,
            cache,
            orchestrator,
            ranker: ImportanceRanker::new(config.ranking),
        }
    }

    /// The underlying orchestrator, for callers wiring up the scheduler.
    #[must_use]
    pub fn orchestrator(&self) -> &JobOrchestrator<S> {
        &self.orchestrator
    }

    /// Trend result for one topic, served from the cache.
    ///
    /// `force_refresh` skips the read path, recomputes, and overwrites the
    /// cached value.
    pub async fn get_trend_result(
        &self,
        topic_id: &TopicId,
        owner_id: &OwnerId,
        force_refresh: bool,
    ) -> Result<TrendResult> {
        if force_refresh {
            return self.orchestrator.analyze_one(topic_id, owner_id, None).await;
        }
        let key = keys::trend(owner_id, topic_id);
        self.cache
            .get_or_compute(&key, CacheTier::Stable, || async {
                self.orchestrator.analyze_one(topic_id, owner_id, None).await
            })
            .await
    }

    /// Importance ranking across an owner's active topics.
    ///
    /// Topic results are resolved through the cache; a topic whose
    /// computation fails is skipped (logged) rather than failing the
    /// ranking. `force_refresh` recomputes the ranking list itself.
    pub async fn get_ranking(
        &self,
        owner_id: &OwnerId,
        force_refresh: bool,
    ) -> Result<Vec<RankingEntry>> {
        if owner_id.as_str().is_empty() {
            return Err(InputError::EmptyOwner.into());
        }
        let key = keys::ranking(owner_id);
        if force_refresh {
            let entries = self.compute_ranking(owner_id).await?;
            self.cache.put(&key, CacheTier::Frequent, &entries).await;
            return Ok(entries);
        }
        self.cache
            .get_or_compute(&key, CacheTier::Frequent, || async {
                self.compute_ranking(owner_id).await
            })
            .await
    }

    async fn compute_ranking(&self, owner_id: &OwnerId) -> Result<Vec<RankingEntry>> {
        let topics = self.store.list_active_topics(Some(owner_id)).await?;
        let results = join_all(
            topics
                .iter()
                .map(|topic| self.get_trend_result(&topic.id, owner_id, false)),
        )
        .await;

        let mut usable = Vec::with_capacity(results.len());
        for (topic, result) in topics.iter().zip(results) {
            match result {
                Ok(trend) => usable.push(trend),
                Err(e) => {
                    warn!(topic = %topic.id, error = %e, "Skipping topic in ranking");
                }
            }
        }
        Ok(self.ranker.rank(owner_id, &usable))
    }

    /// Drop every cached trend for one topic. Returns whether anything was
    /// removed.
    pub async fn invalidate_topic_cache(&self, topic_id: &TopicId) -> bool {
        self.cache
            .invalidate_pattern(&keys::trend_topic_pattern(topic_id))
            .await
            > 0
    }

    /// Drop every cached trend and the ranking for one owner. Returns the
    /// count of entries removed.
    pub async fn invalidate_owner_cache(&self, owner_id: &OwnerId) -> usize {
        let trends = self
            .cache
            .invalidate_pattern(&keys::trend_owner_pattern(owner_id))
            .await;
        let rankings = self.cache.invalidate_pattern(&keys::ranking(owner_id)).await;
        trends + rankings
    }

    /// Queue a detached analysis job for one topic.
    pub async fn submit_analyze_job(&self, topic_id: TopicId, owner_id: OwnerId) -> JobId {
        self.orchestrator.submit_analyze_job(topic_id, owner_id).await
    }

    /// Queue a detached bulk job for one owner.
    pub async fn submit_bulk_job(&self, owner_id: OwnerId) -> JobId {
        self.orchestrator.submit_bulk_job(owner_id).await
    }

    /// Poll a submitted job's status.
    pub async fn get_job_status(&self, job_id: &JobId) -> Result<JobStatus> {
        self.orchestrator.job_status(job_id).await
    }
}
