//! The layered get-or-compute cache.
//!
//! Reads walk the tier ladder fastest-first and promote slow-tier hits
//! into every faster tier. A backend outage degrades to direct
//! computation; it never becomes a caller-visible failure.

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::backend::CacheBackend;
use super::memory::MemoryBackend;
use super::tier::CacheTier;
use crate::config::CacheConfig;
use crate::error::Result;

/// Keys deleted per invalidation batch.
const INVALIDATION_BATCH: usize = 25;
/// Pause between invalidation batches, keeping bulk invalidation from
/// monopolizing a shared backend.
const INVALIDATION_PAUSE_MS: u64 = 50;

/// Multi-tier cache facade over a raw [`CacheBackend`].
pub struct TieredCache {
    backend: Arc<dyn CacheBackend>,
    config: CacheConfig,
}

impl TieredCache {
    pub fn new(backend: Arc<dyn CacheBackend>, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    /// Convenience constructor over the in-process backend.
    #[must_use]
    pub fn in_memory(config: CacheConfig) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), config)
    }

    /// The raw backend, shared with collaborators that need direct key
    /// access (the advisory lease).
    #[must_use]
    pub fn backend(&self) -> Arc<dyn CacheBackend> {
        Arc::clone(&self.backend)
    }

    /// Configured TTL for a tier.
    #[must_use]
    pub fn tier_ttl(&self, tier: CacheTier) -> chrono::Duration {
        tier.ttl(&self.config)
    }

    /// Read a value, checking tiers fastest-first up to `tier`.
    ///
    /// A hit in a slower tier is promoted into every faster tier before
    /// returning. Backend and decode errors read as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, tier: CacheTier) -> Option<T> {
        let ladder = tier.ladder_through();
        for (depth, current) in ladder.iter().enumerate() {
            let storage_key = current.storage_key(key);
            match self.backend.get(&storage_key).await {
                Ok(Some(raw)) => match serde_json::from_str(&raw) {
                    Ok(value) => {
                        if depth > 0 {
                            self.promote(key, &raw, &ladder[..depth]).await;
                        }
                        debug!(key, tier = current.prefix(), "Cache hit");
                        return Some(value);
                    }
                    Err(e) => {
                        warn!(key, tier = current.prefix(), error = %e, "Discarding undecodable cache entry");
                        let _ = self.backend.delete(&storage_key).await;
                        return None;
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    warn!(key, tier = current.prefix(), error = %e, "Cache read failed, trying next tier");
                }
            }
        }
        None
    }

    /// Write a value through every tier from the fastest up to `tier`.
    ///
    /// Write failures are logged and swallowed: a value that could not be
    /// cached is still a valid value.
    pub async fn put<T: Serialize>(&self, key: &str, tier: CacheTier, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize value for cache");
                return;
            }
        };
        for current in tier.ladder_through() {
            let ttl = current.ttl(&self.config);
            if let Err(e) = self.backend.set(&current.storage_key(key), &raw, ttl).await {
                warn!(key, tier = current.prefix(), error = %e, "Cache write failed");
            }
        }
    }

    /// Get a cached value or compute it exactly once.
    ///
    /// On a miss across all tiers the computed value is written through
    /// every tier and returned. A `compute` error propagates unchanged and
    /// never caches a partial value. A failing backend degrades to direct
    /// computation.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, tier: CacheTier, compute: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get(key, tier).await {
            return Ok(value);
        }
        let value = compute().await?;
        self.put(key, tier, &value).await;
        Ok(value)
    }

    /// Remove every entry whose logical key matches a `*`-wildcard pattern.
    ///
    /// Deletion runs in small batches with a brief pause between them so
    /// bulk invalidation cannot monopolize a shared backend. Returns the
    /// count actually removed; best-effort under backend errors.
    pub async fn invalidate_pattern(&self, pattern: &str) -> usize {
        let mut storage_keys = Vec::new();
        for tier in CacheTier::LADDER {
            match self.backend.keys(&tier.storage_key(pattern)).await {
                Ok(mut keys) => storage_keys.append(&mut keys),
                Err(e) => {
                    warn!(pattern, tier = tier.prefix(), error = %e, "Failed to enumerate keys for invalidation");
                }
            }
        }

        let batches = storage_keys.len().div_ceil(INVALIDATION_BATCH);
        let mut removed = 0;
        for (index, batch) in storage_keys.chunks(INVALIDATION_BATCH).enumerate() {
            for key in batch {
                match self.backend.delete(key).await {
                    Ok(true) => removed += 1,
                    Ok(false) => {}
                    Err(e) => warn!(key, error = %e, "Failed to delete cache key"),
                }
            }
            if index + 1 < batches {
                tokio::time::sleep(std::time::Duration::from_millis(INVALIDATION_PAUSE_MS)).await;
            }
        }

        debug!(pattern, removed, "Invalidated cache entries");
        removed
    }

    /// Copy a raw hit into the given faster tiers, each with its own TTL.
    async fn promote(&self, key: &str, raw: &str, faster: &[CacheTier]) {
        for tier in faster {
            let ttl = tier.ttl(&self.config);
            if let Err(e) = self.backend.set(&tier.storage_key(key), raw, ttl).await {
                warn!(key, tier = tier.prefix(), error = %e, "Cache promotion failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CacheError, Error};

    use async_trait::async_trait;

    /// Backend whose every call fails, for outage behavior.
    struct DownBackend;

    #[async_trait]
    impl CacheBackend for DownBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Cache(CacheError::Backend("down".into())))
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: chrono::Duration) -> Result<()> {
            Err(Error::Cache(CacheError::Backend("down".into())))
        }
        async fn set_if_absent(
            &self,
            _key: &str,
            _value: &str,
            _ttl: chrono::Duration,
        ) -> Result<bool> {
            Err(Error::Cache(CacheError::Backend("down".into())))
        }
        async fn delete(&self, _key: &str) -> Result<bool> {
            Err(Error::Cache(CacheError::Backend("down".into())))
        }
        async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
            Err(Error::Cache(CacheError::Backend("down".into())))
        }
    }

    fn cache() -> TieredCache {
        TieredCache::in_memory(CacheConfig::default())
    }

    #[tokio::test]
    async fn miss_computes_and_caches() {
        let cache = cache();
        let value: u32 = cache
            .get_or_compute("k", CacheTier::Stable, || async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(cache.get::<u32>("k", CacheTier::Stable).await, Some(7));
    }

    #[tokio::test]
    async fn second_read_skips_compute() {
        let cache = cache();
        let _: u32 = cache
            .get_or_compute("k", CacheTier::Stable, || async { Ok(1) })
            .await
            .unwrap();
        let value: u32 = cache
            .get_or_compute("k", CacheTier::Stable, || async {
                panic!("compute must not run on a hit")
            })
            .await
            .unwrap();
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn compute_error_propagates_and_caches_nothing() {
        let cache = cache();
        let result: Result<u32> = cache
            .get_or_compute("k", CacheTier::Stable, || async {
                Err(Error::Cache(CacheError::Backend("boom".into())))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.get::<u32>("k", CacheTier::Stable).await, None);
    }

    #[tokio::test]
    async fn slow_tier_hit_promotes_to_faster_tiers() {
        let cache = cache();
        let backend = cache.backend();

        // Seed only the slowest tier.
        backend
            .set("static:k", "42", chrono::Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(cache.get::<u32>("k", CacheTier::Static).await, Some(42));

        // The read should have copied the value into every faster tier.
        for prefix in ["rt", "freq", "stable"] {
            let raw = backend.get(&format!("{prefix}:k")).await.unwrap();
            assert_eq!(raw, Some("42".to_string()), "missing promotion in {prefix}");
        }
    }

    #[tokio::test]
    async fn down_backend_degrades_to_direct_computation() {
        let cache = TieredCache::new(Arc::new(DownBackend), CacheConfig::default());
        let value: u32 = cache
            .get_or_compute("k", CacheTier::Stable, || async { Ok(9) })
            .await
            .unwrap();
        assert_eq!(value, 9);
    }

    #[tokio::test]
    async fn realtime_tier_writes_touch_only_realtime() {
        let cache = cache();
        cache.put("k", CacheTier::Realtime, &5_u32).await;

        let backend = cache.backend();
        assert!(backend.get("rt:k").await.unwrap().is_some());
        assert!(backend.get("freq:k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalidate_pattern_counts_removed_entries() {
        let cache = cache();
        cache.put("trend:o1:t1", CacheTier::Stable, &1_u32).await;
        cache.put("trend:o1:t2", CacheTier::Stable, &2_u32).await;
        cache.put("trend:o2:t3", CacheTier::Stable, &3_u32).await;

        // Each stable-tier put lands in 3 tiers.
        let removed = cache.invalidate_pattern("trend:o1:*").await;
        assert_eq!(removed, 6);
        assert_eq!(cache.get::<u32>("trend:o1:t1", CacheTier::Stable).await, None);
        assert_eq!(cache.get::<u32>("trend:o2:t3", CacheTier::Stable).await, Some(3));
    }

    #[tokio::test]
    async fn invalidate_pattern_with_no_matches_returns_zero() {
        let cache = cache();
        assert_eq!(cache.invalidate_pattern("nothing:*").await, 0);
    }

    #[tokio::test]
    async fn undecodable_entry_reads_as_miss_and_is_dropped() {
        let cache = cache();
        let backend = cache.backend();
        backend
            .set("rt:k", "not-json{", chrono::Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(cache.get::<u32>("k", CacheTier::Realtime).await, None);
        assert!(backend.get("rt:k").await.unwrap().is_none());
    }
}
