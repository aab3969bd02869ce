//! Per-document scorers: term importance, engagement, sentiment, virality.
//!
//! All scorers are pure over their inputs; the aggregator combines their
//! outputs into topic-level results.

mod engagement;
mod sentiment;
mod text;

pub use engagement::EngagementScorer;
pub use sentiment::{sentiment_score, virality_score};
pub use text::{TextScorer, TextScores};
