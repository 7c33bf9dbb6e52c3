//! Similarity Ranker
//!
//! Scores every corpus item against a query vector and keeps the best `n`:
//!
//! ```text
//! blended = cosine(query, title) * (1 + w_pop * popularity_norm + w_sent * sentiment)
//! ```
//!
//! The blend is not clamped. A zero query vector scores every item `0.0`, and
//! the stable sort then returns the first `n` items in corpus order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::config::BlendWeights;
use crate::corpus::{Corpus, CorpusItem};
use crate::embeddings::{cosine_with_norms, l2_norm};

/// How one item's blended score was formed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub cosine: f32,
    pub boost: f32,
    pub blended: f32,
}

/// Score one item against a query whose norm is already known
#[inline]
pub fn explain(query: &[f32], query_norm: f32, item: &CorpusItem, weights: &BlendWeights) -> ScoreBreakdown {
    let cosine = cosine_with_norms(query, query_norm, item.title_embedding(), item.title_norm());
    let boost = weights.boost(item.popularity_norm, item.sentiment_polarity);
    ScoreBreakdown {
        cosine,
        boost,
        blended: cosine * boost,
    }
}

/// Blended score of one item
#[inline]
pub fn blend(cosine: f32, item: &CorpusItem, weights: &BlendWeights) -> f32 {
    cosine * weights.boost(item.popularity_norm, item.sentiment_polarity)
}

/// Blended score of every item, in corpus order
pub fn score_all(query: &[f32], corpus: &Corpus, weights: &BlendWeights) -> Vec<f32> {
    let query_norm = l2_norm(query);
    corpus
        .iter()
        .map(|item| explain(query, query_norm, item, weights).blended)
        .collect()
}

/// The `n` best items as `(corpus index, blended score)`, best first
///
/// Ties keep corpus order. `n` larger than the corpus returns every item.
pub fn rank(query: &[f32], corpus: &Corpus, n: usize, weights: &BlendWeights) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = score_all(query, corpus, weights)
        .into_iter()
        .enumerate()
        .collect();

    // stable: equal scores stay in corpus order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(n);
    scored
}

// ============================================================================
// TESTS
// ============================================================================
