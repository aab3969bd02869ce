//! Raw key-value backend behind the tiered cache.

use async_trait::async_trait;

use crate::error::Result;

/// Storage operations the tiered cache builds on.
///
/// Implementations must be safe under concurrent access without external
/// coordination. Values are already-serialized strings; the tiered layer
/// owns serialization and tier prefixes.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a live value. Expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Set a value with a TTL, replacing any existing entry.
    async fn set(&self, key: &str, value: &str, ttl: chrono::Duration) -> Result<()>;

    /// Set only if no live value exists. Returns whether the write happened.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: chrono::Duration) -> Result<bool>;

    /// Delete a key. Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Enumerate live keys matching a `*`-wildcard pattern.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}
