//! Topic-level analysis: aggregation into trend results and cross-topic
//! importance ranking.

mod aggregator;
mod ranker;

pub use aggregator::{classify_direction, confidence_score, velocity_from_runs, TrendAggregator};
pub use ranker::ImportanceRanker;
