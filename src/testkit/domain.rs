//! Builders for domain primitives used across tests.
//!
//! Concise factories for topics, documents, and snapshot history so tests
//! focus on assertions rather than construction boilerplate.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Document, DocumentId, MetricSnapshot, Topic, TopicId};

/// Create an active [`Topic`].
pub fn topic(id: &str, owner: &str) -> Topic {
    Topic::new(id, owner, format!("topic {id}"))
}

/// Create an inactive [`Topic`].
pub fn inactive_topic(id: &str, owner: &str) -> Topic {
    let mut topic = Topic::new(id, owner, format!("topic {id}"));
    topic.active = false;
    topic
}

/// Create a [`Document`] with engagement counters.
pub fn document(id: &str, topic: &str, content: &str, popularity: u64, replies: u64) -> Document {
    Document::new(id, topic, content).with_engagement(popularity, replies)
}

/// Generate `n` documents named `d0`, `d1`, ... with varied text and
/// engagement so scorers have signal to work with.
pub fn make_documents(topic: &str, n: usize) -> Vec<Document> {
    let phrases = [
        "rust release brings async improvements",
        "terrible regression in the compiler build",
        "adoption keeps growing across infrastructure teams",
        "great new tooling for embedded development",
        "community survey results and ecosystem progress",
    ];
    (0..n)
        .map(|i| {
            document(
                &format!("d{i}"),
                topic,
                phrases[i % phrases.len()],
                (i as u64 + 1) * 10,
                i as u64 * 2,
            )
        })
        .collect()
}

/// One snapshot row with the given engagement at a fixed instant.
pub fn snapshot(topic: &str, doc: &str, engagement: f64, at: DateTime<Utc>) -> MetricSnapshot {
    MetricSnapshot {
        topic_id: TopicId::new(topic),
        document_id: DocumentId::new(doc),
        engagement,
        term_importance: 0.0,
        velocity: 0.0,
        sentiment: 0.0,
        virality: 0.0,
        recorded_at: at,
    }
}

/// One history run per engagement value, one day apart, oldest first.
pub fn history_runs(topic: &str, engagements: &[f64]) -> Vec<MetricSnapshot> {
    let start = Utc::now() - Duration::days(engagements.len() as i64);
    engagements
        .iter()
        .enumerate()
        .map(|(i, &engagement)| snapshot(topic, "d0", engagement, start + Duration::days(i as i64)))
        .collect()
}
