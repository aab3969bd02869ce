//! Core domain types: identifiers, topics, documents, metric history,
//! trend results, and ranking entries.

mod id;
mod ranking;
mod snapshot;
mod topic;
mod trend;

pub use id::{DocumentId, JobId, OwnerId, TopicId};
pub use ranking::RankingEntry;
pub use snapshot::{run_engagement_averages, MetricSnapshot};
pub use topic::{Document, Topic};
pub use trend::{
    DocumentScore, EngagementDistribution, TermWeight, TrendDirection, TrendResult,
    ENGAGEMENT_HIGH_BOUND, ENGAGEMENT_LOW_BOUND,
};
