//! In-process cache backend on a concurrent map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::backend::CacheBackend;
use super::pattern::key_matches;
use crate::error::Result;

/// One stored value with its expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Concurrent in-memory backend with lazy expiry.
///
/// Expired entries are dropped on read; `keys` also prunes what it touches.
/// Suitable for single-process deployments and as the test backend; a
/// shared deployment swaps in a networked implementation of
/// [`CacheBackend`].
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries.iter().filter(|e| e.value().is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Utc::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Entry missing or expired; drop the stale row if present.
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: chrono::Duration) -> Result<()> {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: chrono::Duration) -> Result<bool> {
        let now = Utc::now();
        let fresh = CacheEntry {
            value: value.to_string(),
            expires_at: now + ttl,
        };
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    Ok(false)
                } else {
                    occupied.insert(fresh);
                    Ok(true)
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                Ok(true)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Utc::now();
        match self.entries.remove(key) {
            Some((_, entry)) => Ok(entry.is_live(now)),
            None => Ok(false),
        }
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let now = Utc::now();
        let mut matches = Vec::new();
        for entry in self.entries.iter() {
            if entry.value().is_live(now) && key_matches(pattern, entry.key()) {
                matches.push(entry.key().clone());
            }
        }
        matches.sort_unstable();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ttl() -> chrono::Duration {
        chrono::Duration::minutes(5)
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let backend = MemoryBackend::new();
        backend.set("k", "v", ttl()).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let backend = MemoryBackend::new();
        backend
            .set("k", "v", chrono::Duration::seconds(-1))
            .await
            .unwrap();
        assert_eq!(backend.get("k").await.unwrap(), None);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn set_if_absent_respects_live_entries() {
        let backend = MemoryBackend::new();
        assert!(backend.set_if_absent("k", "first", ttl()).await.unwrap());
        assert!(!backend.set_if_absent("k", "second", ttl()).await.unwrap());
        assert_eq!(backend.get("k").await.unwrap(), Some("first".to_string()));
    }

    #[tokio::test]
    async fn set_if_absent_replaces_expired_entries() {
        let backend = MemoryBackend::new();
        backend
            .set("k", "old", chrono::Duration::seconds(-1))
            .await
            .unwrap();
        assert!(backend.set_if_absent("k", "new", ttl()).await.unwrap());
        assert_eq!(backend.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn delete_reports_whether_live_entry_existed() {
        let backend = MemoryBackend::new();
        backend.set("k", "v", ttl()).await.unwrap();
        assert!(backend.delete("k").await.unwrap());
        assert!(!backend.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn keys_filters_by_pattern_and_liveness() {
        let backend = MemoryBackend::new();
        backend.set("trend:o1:t1", "a", ttl()).await.unwrap();
        backend.set("trend:o1:t2", "b", ttl()).await.unwrap();
        backend.set("trend:o2:t3", "c", ttl()).await.unwrap();
        backend
            .set("trend:o1:dead", "d", chrono::Duration::seconds(-1))
            .await
            .unwrap();

        let keys = backend.keys("trend:o1:*").await.unwrap();
        assert_eq!(keys, vec!["trend:o1:t1", "trend:o1:t2"]);
    }
}
