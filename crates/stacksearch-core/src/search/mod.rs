//! Search Module
//!
//! The query-to-results pipeline:
//! - Cosine ranking over title embeddings with popularity/sentiment blending
//! - Highlighted body snippets and score display formatting
//! - The [`SearchEngine`] orchestrator that owns the loaded artifacts

mod engine;
mod ranker;
mod snippet;

pub use engine::{EngineStats, LoadError, RankedResult, SearchEngine, SearchResponse};
pub use ranker::{blend, explain, rank, score_all, ScoreBreakdown};
pub use snippet::{
    format_score, format_votes, render_snippet, truncate_chars, SCORE_DISPLAY_WIDTH, SNIPPET_CHARS,
};
