//! Service facade behavior: cache-served reads, force refresh, ranking,
//! and invalidation.

mod support;

use trendwire::cache::{keys, CacheTier};
use trendwire::domain::{OwnerId, RankingEntry, TopicId};
use trendwire::error::Error;
use trendwire::testkit::domain::{document, topic};
use trendwire::testkit::store::FailureKind;

use support::{fixture, Fixture};

/// Seed a topic whose documents share the given popularity, so topics can
/// be ordered by engagement in ranking tests.
fn seed_weighted_topic(fx: &Fixture, topic_id: &str, owner: &str, popularity: u64) {
    fx.store.put_topic(topic(topic_id, owner));
    fx.store.put_document(document(
        &format!("{topic_id}-d0"),
        topic_id,
        "shared subject words plus unique angle alpha",
        popularity,
        popularity / 2,
    ));
    fx.store.put_document(document(
        &format!("{topic_id}-d1"),
        topic_id,
        "shared subject words plus unique angle beta",
        popularity / 2,
        popularity / 4,
    ));
}

#[tokio::test]
async fn cached_read_does_not_reanalyze() {
    let fx = fixture();
    seed_weighted_topic(&fx, "t1", "o1", 100);
    let topic_id = TopicId::new("t1");
    let owner_id = OwnerId::new("o1");

    fx.service
        .get_trend_result(&topic_id, &owner_id, false)
        .await
        .unwrap();
    let after_first = fx.store.snapshot_count(&topic_id);

    fx.service
        .get_trend_result(&topic_id, &owner_id, false)
        .await
        .unwrap();
    assert_eq!(fx.store.snapshot_count(&topic_id), after_first);
}

#[tokio::test]
async fn force_refresh_recomputes_and_overwrites() {
    let fx = fixture();
    seed_weighted_topic(&fx, "t1", "o1", 100);
    let topic_id = TopicId::new("t1");
    let owner_id = OwnerId::new("o1");

    let first = fx
        .service
        .get_trend_result(&topic_id, &owner_id, false)
        .await
        .unwrap();
    let refreshed = fx
        .service
        .get_trend_result(&topic_id, &owner_id, true)
        .await
        .unwrap();
    assert!(refreshed.computed_at >= first.computed_at);

    // Snapshots doubled, and the cache now holds the refreshed run.
    assert_eq!(fx.store.snapshot_count(&topic_id), 4);
    let cached: trendwire::domain::TrendResult = fx
        .cache
        .get(&keys::trend(&owner_id, &topic_id), CacheTier::Stable)
        .await
        .unwrap();
    assert_eq!(cached.computed_at, refreshed.computed_at);
}

#[tokio::test]
async fn unknown_topic_surfaces_input_error() {
    let fx = fixture();
    let err = fx
        .service
        .get_trend_result(&TopicId::new("ghost"), &OwnerId::new("o1"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
}

#[tokio::test]
async fn ranking_orders_by_descending_importance() {
    let fx = fixture();
    // Engagement scores are batch-relative, but term importance and
    // velocity also differ with popularity spread; the heaviest topic must
    // come out on top because its history and engagement dominate.
    seed_weighted_topic(&fx, "quiet", "o1", 4);
    seed_weighted_topic(&fx, "busy", "o1", 400);
    let owner_id = OwnerId::new("o1");

    let ranking = fx.service.get_ranking(&owner_id, false).await.unwrap();
    assert_eq!(ranking.len(), 2);
    assert!(ranking[0].importance >= ranking[1].importance);
    // Descending order is the invariant regardless of which topic wins.
    assert!(ranking
        .windows(2)
        .all(|w| w[0].importance >= w[1].importance));
}

#[tokio::test]
async fn ranking_skips_topics_that_fail_to_compute() {
    let fx = fixture();
    seed_weighted_topic(&fx, "t1", "o1", 100);
    seed_weighted_topic(&fx, "t2", "o1", 100);
    seed_weighted_topic(&fx, "t3", "o1", 100);
    fx.store
        .fail_documents_for(&TopicId::new("t2"), FailureKind::Computation, "boom");

    let ranking = fx
        .service
        .get_ranking(&OwnerId::new("o1"), false)
        .await
        .unwrap();

    assert_eq!(ranking.len(), 2);
    assert!(ranking.iter().all(|e| e.topic_id.as_str() != "t2"));
}

#[tokio::test]
async fn ranking_is_cached_per_owner() {
    let fx = fixture();
    seed_weighted_topic(&fx, "t1", "o1", 100);
    let owner_id = OwnerId::new("o1");

    fx.service.get_ranking(&owner_id, false).await.unwrap();
    let cached: Option<Vec<RankingEntry>> = fx
        .cache
        .get(&keys::ranking(&owner_id), CacheTier::Frequent)
        .await;
    assert!(cached.is_some());
}

#[tokio::test]
async fn empty_owner_id_is_rejected() {
    let fx = fixture();
    let err = fx
        .service
        .get_ranking(&OwnerId::new(""), false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Input(_)));
}

#[tokio::test]
async fn owner_without_topics_ranks_empty() {
    let fx = fixture();
    let ranking = fx
        .service
        .get_ranking(&OwnerId::new("nobody"), false)
        .await
        .unwrap();
    assert!(ranking.is_empty());
}

#[tokio::test]
async fn topic_invalidation_forces_recompute() {
    let fx = fixture();
    seed_weighted_topic(&fx, "t1", "o1", 100);
    let topic_id = TopicId::new("t1");
    let owner_id = OwnerId::new("o1");

    fx.service
        .get_trend_result(&topic_id, &owner_id, false)
        .await
        .unwrap();
    assert!(fx.service.invalidate_topic_cache(&topic_id).await);

    // Cache is cold again: the next read re-runs analysis.
    fx.service
        .get_trend_result(&topic_id, &owner_id, false)
        .await
        .unwrap();
    assert_eq!(fx.store.snapshot_count(&topic_id), 4);
}

#[tokio::test]
async fn invalidating_a_cold_topic_reports_nothing_removed() {
    let fx = fixture();
    assert!(!fx.service.invalidate_topic_cache(&TopicId::new("t1")).await);
}

#[tokio::test]
async fn owner_invalidation_clears_trends_and_ranking() {
    let fx = fixture();
    seed_weighted_topic(&fx, "t1", "o1", 100);
    seed_weighted_topic(&fx, "t2", "o1", 50);
    seed_weighted_topic(&fx, "other", "o2", 50);
    let owner_id = OwnerId::new("o1");

    fx.service.get_ranking(&owner_id, false).await.unwrap();
    fx.service
        .get_trend_result(&TopicId::new("other"), &OwnerId::new("o2"), false)
        .await
        .unwrap();

    let removed = fx.service.invalidate_owner_cache(&owner_id).await;
    // Two topic trends across 3 tiers each, plus the ranking in 2 tiers.
    assert_eq!(removed, 8);

    // The other owner's cache is untouched.
    let other: Option<trendwire::domain::TrendResult> = fx
        .cache
        .get(
            &keys::trend(&OwnerId::new("o2"), &TopicId::new("other")),
            CacheTier::Stable,
        )
        .await;
    assert!(other.is_some());
}
