//! Term-importance scoring over one topic's document batch.
//!
//! Classic tf-idf restricted to unigrams and bigrams, with document
//! frequency bounds to drop noise terms and overly generic terms. Scores
//! are normalized by the best document in the batch, so they are
//! comparable within a single topic batch only - callers must not compare
//! raw outputs across topics.

use std::collections::{BTreeMap, HashMap};

use crate::config::TextConfig;
use crate::domain::{Document, DocumentId, TermWeight};

/// Common English words excluded from the vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because",
    "been", "before", "but", "by", "can", "could", "did", "do", "does", "for", "from", "get",
    "had", "has", "have", "he", "her", "here", "him", "his", "how", "if", "in", "into", "is",
    "it", "its", "just", "like", "me", "more", "most", "my", "no", "not", "now", "of", "on",
    "one", "only", "or", "other", "our", "out", "over", "she", "so", "some", "such", "than",
    "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "up", "was",
    "we", "were", "what", "when", "where", "which", "while", "who", "will", "with", "would",
    "you", "your",
];

/// Output of one text-scoring pass.
#[derive(Debug, Clone, Default)]
pub struct TextScores {
    /// Normalized term-importance per document, 0.0-1.0 within the batch.
    pub by_document: HashMap<DocumentId, f64>,
    /// Top contributing terms across the batch, highest weight first.
    pub top_terms: Vec<TermWeight>,
}

/// Tf-idf scorer over a topic's current document batch.
#[derive(Debug, Clone)]
pub struct TextScorer {
    config: TextConfig,
}

impl TextScorer {
    #[must_use]
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    /// Score every document in the batch.
    ///
    /// The best document scores exactly 1.0. An empty batch yields an empty
    /// map; a single-document batch trivially scores 1.0 because there is
    /// no discriminative signal (callers should weigh confidence
    /// accordingly).
    #[must_use]
    pub fn score(&self, documents: &[Document]) -> TextScores {
        if documents.is_empty() {
            return TextScores::default();
        }

        let n = documents.len();
        let term_counts: Vec<BTreeMap<String, usize>> = documents
            .iter()
            .map(|doc| count_terms(&doc.content))
            .collect();

        // Ordered maps keep every floating-point summation below in a
        // stable order, so identical batches reduce to identical bits.
        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Document frequency bounds only make sense with 2+ documents; a
        // singleton batch keeps its whole vocabulary.
        let apply_bounds = n >= 2;
        let min_df = self.config.min_document_frequency;
        let max_df_ratio = self.config.max_document_ratio;

        let idf = |df: usize| ((1 + n) as f64 / (1 + df) as f64).ln() + 1.0;

        let mut weighted: Vec<(String, f64, f64)> = Vec::new();
        for (term, &df) in &document_frequency {
            if apply_bounds {
                if df < min_df {
                    continue;
                }
                if df as f64 / n as f64 > max_df_ratio {
                    continue;
                }
            }
            let term_idf = idf(df);
            let corpus_weight: f64 = term_counts
                .iter()
                .map(|counts| counts.get(*term).copied().unwrap_or(0) as f64 * term_idf)
                .sum();
            weighted.push(((*term).to_string(), term_idf, corpus_weight));
        }

        // Deterministic vocabulary: heaviest terms first, ties by term.
        weighted.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
        weighted.truncate(self.config.max_features);

        let vocabulary: HashMap<&str, f64> = weighted
            .iter()
            .map(|(term, term_idf, _)| (term.as_str(), *term_idf))
            .collect();

        let sums: Vec<f64> = term_counts
            .iter()
            .map(|counts| {
                counts
                    .iter()
                    .filter_map(|(term, &count)| {
                        vocabulary.get(term.as_str()).map(|idf| count as f64 * idf)
                    })
                    .sum()
            })
            .collect();

        let max_sum = sums.iter().cloned().fold(0.0_f64, f64::max);
        let by_document = documents
            .iter()
            .zip(&sums)
            .map(|(doc, &sum)| {
                let score = if max_sum > 0.0 { sum / max_sum } else { 0.0 };
                (doc.id.clone(), score)
            })
            .collect();

        let top_terms = weighted
            .iter()
            .take(self.config.top_terms)
            .map(|(term, _, weight)| TermWeight {
                term: term.clone(),
                weight: *weight,
            })
            .collect();

        TextScores {
            by_document,
            top_terms,
        }
    }
}

/// Unigram and bigram counts for one document's text.
fn count_terms(text: &str) -> BTreeMap<String, usize> {
    let tokens = tokenize(text);
    let mut counts = BTreeMap::new();
    for token in &tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    counts
}

/// Lower-cased alphanumeric tokens with stop-words removed.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}
