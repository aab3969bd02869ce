//! Lightweight sentiment and virality heuristics.
//!
//! Sentiment is coarse lexicon counting, not a model; the contract is the
//! clamp to [-1, 1] and 0 for empty text. Virality is the growth of the
//! per-run engagement average across the two most recent analysis runs.

use crate::domain::{run_engagement_averages, MetricSnapshot};

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "breakthrough", "brilliant", "celebrate",
    "delight", "excellent", "exciting", "fantastic", "gain", "good", "great", "happy",
    "impressive", "improve", "improved", "incredible", "innovative", "love", "loved",
    "outstanding", "perfect", "popular", "positive", "progress", "promising", "success",
    "successful", "superb", "thrilled", "win", "winner", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "awful", "bad", "broken", "bug", "collapse", "crash", "crisis", "damage", "decline",
    "disappointing", "disaster", "drop", "fail", "failed", "failure", "fear", "hate",
    "horrible", "hurt", "lose", "loss", "negative", "outage", "poor", "problem", "regression",
    "sad", "scandal", "terrible", "threat", "ugly", "warning", "worse", "worst", "wrong",
];

/// Lexicon sentiment for one document's text, clamped to [-1, 1].
///
/// Positive minus negative word count, normalized by total token count.
/// Empty or blank text scores 0.
#[must_use]
pub fn sentiment_score(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.is_empty() {
        return 0.0;
    }

    let mut positive = 0_i64;
    let mut negative = 0_i64;
    for token in &tokens {
        if POSITIVE_WORDS.contains(&token.as_str()) {
            positive += 1;
        } else if NEGATIVE_WORDS.contains(&token.as_str()) {
            negative += 1;
        }
    }

    let raw = (positive - negative) as f64 / tokens.len() as f64;
    raw.clamp(-1.0, 1.0)
}

/// Engagement growth rate across the two most recent analysis runs.
///
/// History rows sharing a `recorded_at` belong to one run. Fewer than two
/// runs, or a shrinking average, yields 0 - virality is never negative and
/// missing history is never an error.
#[must_use]
pub fn virality_score(history: &[MetricSnapshot]) -> f64 {
    let averages = run_engagement_averages(history);
    if averages.len() < 2 {
        return 0.0;
    }
    let slope = averages[averages.len() - 1] - averages[averages.len() - 2];
    slope.max(0.0)
}
