//! Configuration loading from TOML files with environment overrides.
//!
//! Every tunable named in the component designs lives here: cache tier TTLs,
//! vocabulary bounds for term scoring, velocity thresholds, blend weights,
//! and job scheduling knobs. Validation runs once at load time; a bad value
//! is fatal at startup, never a per-request failure.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub text: TextConfig,
    pub engagement: EngagementWeights,
    pub trend: TrendConfig,
    pub ranking: ImportanceWeights,
    pub jobs: JobConfig,
}

/// Cache tier TTLs and the advisory analysis lease.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL for the realtime tier, seconds.
    pub realtime_ttl_secs: u64,
    /// TTL for the frequent tier, seconds.
    pub frequent_ttl_secs: u64,
    /// TTL for the stable tier, seconds.
    pub stable_ttl_secs: u64,
    /// TTL for the static tier, seconds.
    pub static_ttl_secs: u64,
    /// Whether `analyze_one` acquires a short-lived per-topic lease.
    pub lease_enabled: bool,
    /// TTL for the advisory lease key, seconds.
    pub lease_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            realtime_ttl_secs: 5 * 60,
            frequent_ttl_secs: 30 * 60,
            stable_ttl_secs: 2 * 60 * 60,
            static_ttl_secs: 24 * 60 * 60,
            lease_enabled: false,
            lease_ttl_secs: 60,
        }
    }
}

/// Vocabulary bounds for term-importance scoring.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Maximum vocabulary size kept per batch.
    pub max_features: usize,
    /// Terms must appear in at least this many documents (batches of 2+).
    pub min_document_frequency: usize,
    /// Terms appearing in more than this ratio of documents are dropped.
    pub max_document_ratio: f64,
    /// Number of top contributing terms reported per topic.
    pub top_terms: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            min_document_frequency: 2,
            max_document_ratio: 0.8,
            top_terms: 10,
        }
    }
}

/// Blend weights for the engagement score.
///
/// Raw popularity is deliberately favored over discussion volume.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EngagementWeights {
    pub popularity: f64,
    pub replies: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            popularity: 0.6,
            replies: 0.4,
        }
    }
}

/// Velocity thresholds and history depth for trend classification.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Velocity strictly above this classifies as rising.
    pub rising_threshold: f64,
    /// Velocity strictly below this classifies as falling.
    pub falling_threshold: f64,
    /// Maximum metric snapshots fetched per topic for velocity input.
    pub history_limit: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            rising_threshold: 0.1,
            falling_threshold: -0.1,
            history_limit: 500,
        }
    }
}

/// Blend weights for cross-topic importance ranking.
///
/// Velocity enters by magnitude: an accelerating fall is as worth surfacing
/// as an accelerating rise.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ImportanceWeights {
    pub term_importance: f64,
    pub engagement: f64,
    pub velocity: f64,
}

impl Default for ImportanceWeights {
    fn default() -> Self {
        Self {
            term_importance: 0.4,
            engagement: 0.4,
            velocity: 0.2,
        }
    }
}

/// Worker fan-out and scheduling knobs for analysis jobs.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// Maximum topics analyzed concurrently within one bulk job.
    /// 0 means "number of CPUs".
    pub worker_concurrency: usize,
    /// Interval between system-wide scheduled runs, seconds.
    pub schedule_interval_secs: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            worker_concurrency: 0,
            schedule_interval_secs: 24 * 60 * 60,
        }
    }
}

impl JobConfig {
    /// Effective concurrency cap, resolving 0 to the CPU count.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        if self.worker_concurrency == 0 {
            num_cpus::get().max(1)
        } else {
            self.worker_concurrency
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, apply environment overrides,
    /// and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Config = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Build a config from defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Overlay `TRENDWIRE_*` environment variables on top of file values.
    fn apply_env_overrides(&mut self) {
        env_u64("TRENDWIRE_REALTIME_TTL_SECS", &mut self.cache.realtime_ttl_secs);
        env_u64("TRENDWIRE_FREQUENT_TTL_SECS", &mut self.cache.frequent_ttl_secs);
        env_u64("TRENDWIRE_STABLE_TTL_SECS", &mut self.cache.stable_ttl_secs);
        env_u64("TRENDWIRE_STATIC_TTL_SECS", &mut self.cache.static_ttl_secs);
        env_usize("TRENDWIRE_MAX_FEATURES", &mut self.text.max_features);
        env_f64("TRENDWIRE_RISING_THRESHOLD", &mut self.trend.rising_threshold);
        env_f64("TRENDWIRE_FALLING_THRESHOLD", &mut self.trend.falling_threshold);
        env_usize(
            "TRENDWIRE_WORKER_CONCURRENCY",
            &mut self.jobs.worker_concurrency,
        );
        env_u64(
            "TRENDWIRE_SCHEDULE_INTERVAL_SECS",
            &mut self.jobs.schedule_interval_secs,
        );
    }

    pub fn validate(&self) -> Result<()> {
        for (field, ttl) in [
            ("cache.realtime_ttl_secs", self.cache.realtime_ttl_secs),
            ("cache.frequent_ttl_secs", self.cache.frequent_ttl_secs),
            ("cache.stable_ttl_secs", self.cache.stable_ttl_secs),
            ("cache.static_ttl_secs", self.cache.static_ttl_secs),
            ("cache.lease_ttl_secs", self.cache.lease_ttl_secs),
        ] {
            if ttl == 0 {
                return Err(invalid(field, "must be greater than zero").into());
            }
        }

        if self.text.max_features == 0 {
            return Err(invalid("text.max_features", "must be at least 1").into());
        }
        if self.text.min_document_frequency == 0 {
            return Err(invalid("text.min_document_frequency", "must be at least 1").into());
        }
        if !(self.text.max_document_ratio > 0.0 && self.text.max_document_ratio <= 1.0) {
            return Err(invalid("text.max_document_ratio", "must be in (0, 1]").into());
        }
        if self.text.top_terms == 0 {
            return Err(invalid("text.top_terms", "must be at least 1").into());
        }

        for (field, weight) in [
            ("engagement.popularity", self.engagement.popularity),
            ("engagement.replies", self.engagement.replies),
            ("ranking.term_importance", self.ranking.term_importance),
            ("ranking.engagement", self.ranking.engagement),
            ("ranking.velocity", self.ranking.velocity),
        ] {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(invalid(field, "must be a non-negative finite number").into());
            }
        }
        let engagement_sum = self.engagement.popularity + self.engagement.replies;
        if (engagement_sum - 1.0).abs() > 1e-9 {
            return Err(invalid("engagement", "popularity and replies weights must sum to 1.0").into());
        }

        if !self.trend.rising_threshold.is_finite() || !self.trend.falling_threshold.is_finite() {
            return Err(invalid("trend", "thresholds must be finite").into());
        }
        if self.trend.falling_threshold >= self.trend.rising_threshold {
            return Err(invalid(
                "trend.falling_threshold",
                "must be below trend.rising_threshold",
            )
            .into());
        }
        if self.trend.history_limit == 0 {
            return Err(invalid("trend.history_limit", "must be at least 1").into());
        }

        if self.jobs.schedule_interval_secs == 0 {
            return Err(invalid("jobs.schedule_interval_secs", "must be greater than zero").into());
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn env_u64(var: &str, slot: &mut u64) {
    if let Ok(raw) = std::env::var(var) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }
}

fn env_usize(var: &str, slot: &mut usize) {
    if let Ok(raw) = std::env::var(var) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }
}

fn env_f64(var: &str, slot: &mut f64) {
    if let Ok(raw) = std::env::var(var) {
        if let Ok(value) = raw.parse() {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn default_ttls_follow_tier_ladder() {
        let config = CacheConfig::default();
        assert!(config.realtime_ttl_secs < config.frequent_ttl_secs);
        assert!(config.frequent_ttl_secs < config.stable_ttl_secs);
        assert!(config.stable_ttl_secs < config.static_ttl_secs);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let mut config = Config::default();
        config.cache.stable_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn engagement_weights_must_sum_to_one() {
        let mut config = Config::default();
        config.engagement.popularity = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let mut config = Config::default();
        config.trend.rising_threshold = -0.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_document_ratio_bounds() {
        let mut config = Config::default();
        config.text.max_document_ratio = 0.0;
        assert!(config.validate().is_err());
        config.text.max_document_ratio = 1.5;
        assert!(config.validate().is_err());
        config.text.max_document_ratio = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[text]\nmax_features = 50\n").unwrap();
        assert_eq!(config.text.max_features, 50);
        assert_eq!(config.text.top_terms, 10);
        assert_eq!(config.cache.realtime_ttl_secs, 300);
    }

    #[test]
    fn effective_concurrency_resolves_zero() {
        let jobs = JobConfig {
            worker_concurrency: 0,
            ..JobConfig::default()
        };
        assert!(jobs.effective_concurrency() >= 1);

        let fixed = JobConfig {
            worker_concurrency: 3,
            ..JobConfig::default()
        };
        assert_eq!(fixed.effective_concurrency(), 3);
    }
}
