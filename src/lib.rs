//! Trendwire - topic trend scoring, ranking, and cache-served analysis.
//!
//! This crate computes and ranks the trendiness of user-tracked topics
//! from short text documents with engagement signals, and serves the
//! results through a multi-tier cache that stays consistent under
//! concurrent readers and writers.
//!
//! # Architecture
//!
//! Per-document scorers feed a topic-level aggregator; an importance
//! ranker orders topics across one owner; everything is served through a
//! tiered cache and refreshed by background jobs:
//!
//! - **`scoring`** - Leaf scorers over a topic's document batch
//!   - `TextScorer` - tf-idf term importance (unigrams + bigrams)
//!   - `EngagementScorer` - normalized popularity/reply blend
//!   - `sentiment_score` / `virality_score` - lightweight heuristics
//!
//! - **`analysis`** - `TrendAggregator` reduces document scores plus
//!   metric history into a `TrendResult`; `ImportanceRanker` orders an
//!   owner's topics
//!
//! - **`cache`** - `TieredCache` with four TTL tiers, promotion-on-hit,
//!   get-or-compute, and pattern invalidation
//!
//! - **`jobs`** - `JobOrchestrator` for single, per-owner, and
//!   system-wide analysis with partial-failure isolation; `run_scheduled`
//!   for the recurring pass
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files with environment overrides
//! - [`domain`] - Typed records: ids, topics, documents, snapshots, results
//! - [`error`] - Error taxonomy for the crate
//! - [`scoring`] - Per-document scorers
//! - [`analysis`] - Aggregation and ranking
//! - [`cache`] - The tiered cache and its backends
//! - [`store`] - Storage port consumed from the relational store
//! - [`jobs`] - Background job orchestration and scheduling
//! - [`service`] - The facade exposed to the API layer
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use trendwire::cache::TieredCache;
//! use trendwire::config::Config;
//! use trendwire::service::TrendService;
//! use trendwire::store::MemoryStore;
//!
//! let config = Config::default();
//! let store = Arc::new(MemoryStore::new());
//! let cache = Arc::new(TieredCache::in_memory(config.cache.clone()));
//! let service = TrendService::new(store, cache, &config);
//! ```

pub mod analysis;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod scoring;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
