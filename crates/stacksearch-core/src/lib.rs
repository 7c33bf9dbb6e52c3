//! # StackSearch Core
//!
//! Semantic search over a fixed corpus of programming questions:
//!
//! - **Query vectors**: mean of pretrained word vectors for the query's words
//! - **Ranking**: cosine similarity against precomputed title embeddings,
//!   boosted by normalized popularity and sentiment polarity
//! - **Snippets**: body excerpts with query words highlighted
//! - **Tag prediction**: multi-label classifier over the same query text
//!
//! Every artifact is loaded once into an immutable [`SearchEngine`] that can
//! be shared across threads.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stacksearch_core::{ArtifactPaths, SearchConfig, SearchEngine};
//!
//! let paths = ArtifactPaths::resolve(None)?;
//! let engine = SearchEngine::load(&paths, SearchConfig::default())?;
//!
//! let response = engine.search("how to sort a list in python", 10);
//! for result in &response.results {
//!     println!("{} ({})", result.title, result.score);
//! }
//! println!("tags: {:?}", response.tags);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod search;
pub mod tagging;
pub mod text;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use config::{
    resolve_data_dir, ArtifactPaths, BlendWeights, ConfigError, SearchConfig, DATA_DIR_ENV,
    DEFAULT_MAX_SEQUENCE_LENGTH, DEFAULT_TAG_COUNT,
};

pub use corpus::{Corpus, CorpusError, CorpusItem, MetadataRecord};

pub use embeddings::{cosine_similarity, vectorize, EmbeddingError, EmbeddingTable};

pub use search::{
    format_score, rank, render_snippet, EngineStats, LoadError, RankedResult, ScoreBreakdown,
    SearchEngine, SearchResponse,
};

pub use tagging::{
    multitask_loss, InferenceSession, SequenceTokenizer, TagClassifier, TagEvaluation,
    TagPredictor, TagVocabulary, TaggingError, TAG_THRESHOLD,
};

pub use text::{preprocess_text, Preprocessor, TextCleaner};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        ArtifactPaths, Corpus, EmbeddingTable, LoadError, Preprocessor, RankedResult,
        SearchConfig, SearchEngine, SearchResponse, TagPredictor,
    };
}
