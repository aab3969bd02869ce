//! Cache tier definitions.
//!
//! Tiers run from fastest/shortest TTL to slowest/longest. Reads walk the
//! ladder fastest-first; a value cached at tier `T` is written to every
//! tier from the fastest through `T`.

use serde::{Deserialize, Serialize};

use crate::config::CacheConfig;

/// One TTL/storage configuration in the layered cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheTier {
    /// 5 minutes by default.
    Realtime,
    /// 30 minutes by default.
    Frequent,
    /// 2 hours by default.
    Stable,
    /// 24 hours by default.
    Static,
}

impl CacheTier {
    /// All tiers, fastest first.
    pub const LADDER: [CacheTier; 4] = [
        CacheTier::Realtime,
        CacheTier::Frequent,
        CacheTier::Stable,
        CacheTier::Static,
    ];

    /// The tiers a value at this tier occupies: fastest through self.
    #[must_use]
    pub fn ladder_through(self) -> &'static [CacheTier] {
        &Self::LADDER[..=self as usize]
    }

    /// Storage key prefix distinguishing this tier's entries.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            CacheTier::Realtime => "rt",
            CacheTier::Frequent => "freq",
            CacheTier::Stable => "stable",
            CacheTier::Static => "static",
        }
    }

    /// Configured TTL for this tier.
    #[must_use]
    pub fn ttl(self, config: &CacheConfig) -> chrono::Duration {
        let secs = match self {
            CacheTier::Realtime => config.realtime_ttl_secs,
            CacheTier::Frequent => config.frequent_ttl_secs,
            CacheTier::Stable => config.stable_ttl_secs,
            CacheTier::Static => config.static_ttl_secs,
        };
        chrono::Duration::seconds(secs as i64)
    }

    /// Full storage key for a logical key in this tier.
    #[must_use]
    pub fn storage_key(self, key: &str) -> String {
        format!("{}:{}", self.prefix(), key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_runs_fastest_to_slowest() {
        let config = CacheConfig::default();
        let ttls: Vec<i64> = CacheTier::LADDER
            .iter()
            .map(|t| t.ttl(&config).num_seconds())
            .collect();
        assert!(ttls.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ladder_through_includes_self() {
        assert_eq!(CacheTier::Realtime.ladder_through(), &[CacheTier::Realtime]);
        assert_eq!(
            CacheTier::Stable.ladder_through(),
            &[CacheTier::Realtime, CacheTier::Frequent, CacheTier::Stable]
        );
        assert_eq!(CacheTier::Static.ladder_through().len(), 4);
    }

    #[test]
    fn storage_keys_are_prefixed_per_tier() {
        assert_eq!(CacheTier::Realtime.storage_key("trend:o1:t1"), "rt:trend:o1:t1");
        assert_eq!(CacheTier::Static.storage_key("x"), "static:x");
    }

    #[test]
    fn prefixes_are_distinct() {
        let mut prefixes: Vec<&str> = CacheTier::LADDER.iter().map(|t| t.prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), 4);
    }
}
