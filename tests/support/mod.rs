#![allow(dead_code)]

//! Shared fixtures for integration tests.

use std::sync::Arc;

use trendwire::cache::{MemoryBackend, TieredCache};
use trendwire::config::Config;
use trendwire::jobs::JobOrchestrator;
use trendwire::service::TrendService;
use trendwire::testkit::store::FlakyStore;

/// A fully wired service over a flaky store and in-memory cache.
pub struct Fixture {
    pub store: Arc<FlakyStore>,
    pub cache: Arc<TieredCache>,
    pub service: TrendService<FlakyStore>,
}

/// Build a fixture with the default configuration.
pub fn fixture() -> Fixture {
    fixture_with(Config::default())
}

/// Build a fixture with a custom configuration.
pub fn fixture_with(config: Config) -> Fixture {
    let store = Arc::new(FlakyStore::new());
    let cache = Arc::new(TieredCache::new(
        Arc::new(MemoryBackend::new()),
        config.cache.clone(),
    ));
    let service = TrendService::new(Arc::clone(&store), Arc::clone(&cache), &config);
    Fixture {
        store,
        cache,
        service,
    }
}

/// A bare orchestrator over the fixture's store and cache.
pub fn orchestrator(fixture: &Fixture, config: &Config) -> JobOrchestrator<FlakyStore> {
    JobOrchestrator::new(Arc::clone(&fixture.store), Arc::clone(&fixture.cache), config)
}

/// Initialize test logging once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
