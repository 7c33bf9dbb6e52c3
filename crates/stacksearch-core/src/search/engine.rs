//! Search Orchestrator
//!
//! Owns every loaded artifact and composes the two independent pipelines a
//! query runs through:
//!
//! ```text
//! query -> preprocess -+-> vectorize -> rank -> render snippets -> results
//!                      +-> tokenize  -> classify -> threshold   -> tags
//! ```
//!
//! The engine is immutable after construction and is shared between requests
//! behind an `Arc`.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use super::ranker::{explain, rank, ScoreBreakdown};
use super::snippet::{format_score, format_votes, render_snippet};
use crate::config::{ArtifactPaths, ConfigError, SearchConfig};
use crate::corpus::{Corpus, CorpusError, CorpusItem};
use crate::embeddings::{l2_norm, vectorize, EmbeddingError, EmbeddingTable};
use crate::tagging::{
    SequenceTokenizer, TagClassifier, TagEvaluation, TagPredictor, TagVocabulary, TaggingError,
};
use crate::text::{Preprocessor, TextCleaner};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Startup errors; any of these is fatal to the service
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Artifact files that do not exist
    #[error("Missing artifacts: {}", format_missing(.0))]
    Missing(Vec<(&'static str, PathBuf)>),
    #[error("Failed to load word vectors from {path}: {source}")]
    WordVectors {
        path: PathBuf,
        #[source]
        source: EmbeddingError,
    },
    #[error("Failed to load corpus from {metadata}: {source}")]
    Corpus {
        metadata: PathBuf,
        #[source]
        source: CorpusError,
    },
    #[error("Failed to load {artifact} from {path}: {source}")]
    Tagging {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: TaggingError,
    },
    /// Tokenizer, classifier and tag vocabulary do not fit together
    #[error("Tag model artifacts are inconsistent: {0}")]
    TagModel(#[source] TaggingError),
    /// Query vectors and title embeddings live in different spaces
    #[error("Word vectors have {word_vectors} dimensions but title embeddings have {title_embeddings}")]
    DimensionMismatch {
        word_vectors: usize,
        title_embeddings: usize,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn format_missing(missing: &[(&'static str, PathBuf)]) -> String {
    missing
        .iter()
        .map(|(name, path)| format!("{} ({})", name, path.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// RESULT TYPES
// ============================================================================

/// One ranked corpus item, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    /// Position in the corpus
    #[serde(skip)]
    pub index: usize,
    /// Display title
    pub title: String,
    pub url: String,
    /// Blended score; serialized as its 5-character display string
    #[serde(rename = "similarity_score", serialize_with = "serialize_score")]
    pub score: f32,
    /// Raw popularity; serialized as a string
    #[serde(serialize_with = "serialize_votes")]
    pub votes: f64,
    /// Highlighted body excerpt
    #[serde(rename = "body")]
    pub snippet: String,
}

fn serialize_score<S: Serializer>(score: &f32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_score(*score))
}

fn serialize_votes<S: Serializer>(votes: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_votes(*votes))
}

/// Full answer to one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Predicted tags, in vocabulary order
    pub tags: Vec<String>,
    /// Best matches, best first
    pub results: Vec<RankedResult>,
}

/// Sizes and shapes of the loaded artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub corpus_items: usize,
    pub embedding_dimensions: usize,
    pub word_vectors: usize,
    pub tokenizer_bound: usize,
    pub classifier_vocabulary: usize,
    pub classifier_embedding_dim: usize,
    pub tags: usize,
    pub max_sequence_length: usize,
}

// ============================================================================
// SEARCH ENGINE
// ============================================================================

/// Immutable search service state
pub struct SearchEngine {
    config: SearchConfig,
    preprocessor: Box<dyn Preprocessor>,
    word_vectors: EmbeddingTable,
    corpus: Corpus,
    tagger: TagPredictor,
}

impl SearchEngine {
    /// Assemble an engine from loaded parts with the default text cleaner
    pub fn new(
        config: SearchConfig,
        word_vectors: EmbeddingTable,
        corpus: Corpus,
        tagger: TagPredictor,
    ) -> Result<Self, LoadError> {
        if word_vectors.dimensions() != corpus.dimensions() {
            return Err(LoadError::DimensionMismatch {
                word_vectors: word_vectors.dimensions(),
                title_embeddings: corpus.dimensions(),
            });
        }

        Ok(Self {
            config,
            preprocessor: Box::new(TextCleaner::new()),
            word_vectors,
            corpus,
            tagger,
        })
    }

    /// Replace the query preprocessor
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.preprocessor = Box::new(preprocessor);
        self
    }

    /// Load every artifact and build the engine
    pub fn load(paths: &ArtifactPaths, config: SearchConfig) -> Result<Self, LoadError> {
        let start = Instant::now();

        let missing: Vec<(&'static str, PathBuf)> = paths
            .missing()
            .into_iter()
            .map(|(name, path)| (name, path.to_path_buf()))
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::Missing(missing));
        }

        let word_vectors =
            EmbeddingTable::load(&paths.word_vectors).map_err(|source| LoadError::WordVectors {
                path: paths.word_vectors.clone(),
                source,
            })?;

        let corpus = Corpus::load(&paths.metadata, &paths.title_embeddings).map_err(|source| {
            LoadError::Corpus {
                metadata: paths.metadata.clone(),
                source,
            }
        })?;

        let tagging = |artifact: &'static str, path: &PathBuf| {
            let path = path.clone();
            move |source| LoadError::Tagging {
                artifact,
                path,
                source,
            }
        };
        let tokenizer = SequenceTokenizer::load(&paths.tokenizer)
            .map_err(tagging("tokenizer", &paths.tokenizer))?;
        let classifier = TagClassifier::load(&paths.classifier)
            .map_err(tagging("classifier", &paths.classifier))?;
        let vocabulary = TagVocabulary::load(&paths.tag_vocabulary)
            .map_err(tagging("tag vocabulary", &paths.tag_vocabulary))?;

        let tagger = TagPredictor::new(tokenizer, classifier, vocabulary, config.max_sequence_length)
            .map_err(LoadError::TagModel)?;

        let engine = Self::new(config, word_vectors, corpus, tagger)?;
        info!(
            items = engine.corpus.len(),
            words = engine.word_vectors.len(),
            dimensions = engine.corpus.dimensions(),
            tags = engine.tagger.vocabulary().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search engine ready"
        );
        Ok(engine)
    }

    /// Rank the corpus and predict tags for one query
    ///
    /// The query is cleaned once and the same text feeds both pipelines.
    pub fn search(&self, query: &str, num_results: usize) -> SearchResponse {
        let cleaned = self.preprocessor.preprocess(query);
        let tags = self.tagger.predict(&cleaned);
        let results = self.rank_cleaned(&cleaned, num_results);

        debug!(
            query = %cleaned,
            num_results,
            returned = results.len(),
            tags = tags.len(),
            "Search complete"
        );
        SearchResponse { tags, results }
    }

    /// Ranking pipeline only
    pub fn rank_query(&self, query: &str, num_results: usize) -> Vec<RankedResult> {
        let cleaned = self.preprocessor.preprocess(query);
        self.rank_cleaned(&cleaned, num_results)
    }

    /// Ranking pipeline with the score breakdown of every returned item
    pub fn explain(&self, query: &str, num_results: usize) -> Vec<(RankedResult, ScoreBreakdown)> {
        let cleaned = self.preprocessor.preprocess(query);
        let query_vector = self.query_vector(&cleaned);
        let query_norm = l2_norm(&query_vector);

        self.rank_cleaned(&cleaned, num_results)
            .into_iter()
            .filter_map(|result| {
                let item = self.corpus.get(result.index)?;
                let breakdown = explain(&query_vector, query_norm, item, &self.config.blend);
                Some((result, breakdown))
            })
            .collect()
    }

    /// Tag pipeline only
    pub fn predict_tags(&self, text: &str) -> Vec<String> {
        let cleaned = self.preprocessor.preprocess(text);
        let mut session = self.tagger.session();
        self.tagger.predict_with(&mut session, &cleaned)
    }

    /// Score the tag predictor on labelled `(text, tags)` pairs
    pub fn evaluate_tags(&self, samples: &[(String, Vec<String>)]) -> TagEvaluation {
        let cleaned: Vec<(String, Vec<String>)> = samples
            .iter()
            .map(|(text, tags)| (self.preprocessor.preprocess(text), tags.clone()))
            .collect();
        self.tagger.evaluate(&cleaned)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            corpus_items: self.corpus.len(),
            embedding_dimensions: self.corpus.dimensions(),
            word_vectors: self.word_vectors.len(),
            tokenizer_bound: self.tagger.tokenizer().vocabulary_bound(),
            classifier_vocabulary: self.tagger.classifier().vocabulary_size(),
            classifier_embedding_dim: self.tagger.classifier().embedding_dim(),
            tags: self.tagger.vocabulary().len(),
            max_sequence_length: self.tagger.max_sequence_length(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    fn query_vector(&self, cleaned: &str) -> Vec<f32> {
        vectorize(cleaned, &self.word_vectors, self.word_vectors.dimensions())
    }

    fn rank_cleaned(&self, cleaned: &str, num_results: usize) -> Vec<RankedResult> {
        let query_vector = self.query_vector(cleaned);
        rank(&query_vector, &self.corpus, num_results, &self.config.blend)
            .into_iter()
            .filter_map(|(index, score)| {
                let item = self.corpus.get(index)?;
                Some(to_result(index, score, item, cleaned))
            })
            .collect()
    }
}

fn to_result(index: usize, score: f32, item: &CorpusItem, query: &str) -> RankedResult {
    RankedResult {
        index,
        title: item.display_title.clone(),
        url: item.url.clone(),
        score,
        votes: item.votes,
        snippet: render_snippet(&item.body, query),
    }
}

// ============================================================================
// TESTS
// ============================================================================
