//! Search configuration and artifact locations

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Sequence length the tag classifier was trained with
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 300;

/// Number of most-frequent tags the classifier predicts over
pub const DEFAULT_TAG_COUNT: usize = 500;

/// Weight of normalized popularity in the blended score
pub const POPULARITY_WEIGHT: f32 = 0.4;

/// Weight of sentiment polarity in the blended score
pub const SENTIMENT_WEIGHT: f32 = 0.1;

/// Environment variable overriding the artifact directory
pub const DATA_DIR_ENV: &str = "STACKSEARCH_DATA_DIR";

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Configuration error types
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting is out of range
    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    /// No artifact directory could be determined
    #[error("Could not determine a data directory; pass one explicitly or set STACKSEARCH_DATA_DIR")]
    NoDataDir,
}

// ============================================================================
// BLEND WEIGHTS
// ============================================================================

/// Multiplicative boost weights applied on top of cosine similarity
///
/// `blended = cosine * (1 + popularity * popularity_norm + sentiment * sentiment_polarity)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendWeights {
    pub popularity: f32,
    pub sentiment: f32,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            popularity: POPULARITY_WEIGHT,
            sentiment: SENTIMENT_WEIGHT,
        }
    }
}

impl BlendWeights {
    /// Create weights, rejecting non-finite values
    pub fn new(popularity: f32, sentiment: f32) -> Result<Self, ConfigError> {
        for (name, value) in [("popularity", popularity), ("sentiment", sentiment)] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    name,
                    reason: format!("weight must be finite, got {}", value),
                });
            }
        }
        Ok(Self {
            popularity,
            sentiment,
        })
    }

    /// The multiplicative factor for one item
    #[inline]
    pub fn boost(&self, popularity_norm: f32, sentiment_polarity: f32) -> f32 {
        1.0 + self.popularity * popularity_norm + self.sentiment * sentiment_polarity
    }
}

// ============================================================================
// SEARCH CONFIG
// ============================================================================

/// Tunables for the search pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Classifier input length; shorter inputs are padded, longer truncated
    pub max_sequence_length: usize,
    /// Popularity/sentiment boost weights
    pub blend: BlendWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            blend: BlendWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Create a validated configuration
    pub fn new(max_sequence_length: usize, blend: BlendWeights) -> Result<Self, ConfigError> {
        if max_sequence_length == 0 {
            return Err(ConfigError::Invalid {
                name: "max_sequence_length",
                reason: "must be at least 1".to_string(),
            });
        }
        let blend = BlendWeights::new(blend.popularity, blend.sentiment)?;
        Ok(Self {
            max_sequence_length,
            blend,
        })
    }
}

// ============================================================================
// ARTIFACT PATHS
// ============================================================================

/// Locations of the read-only artifacts loaded at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Question metadata table
    pub metadata: PathBuf,
    /// Title-embedding matrix aligned with `metadata`
    pub title_embeddings: PathBuf,
    /// word2vec text export
    pub word_vectors: PathBuf,
    /// Classifier tokenizer vocabulary
    pub tokenizer: PathBuf,
    /// Classifier weights
    pub classifier: PathBuf,
    /// Tag names in classifier output order
    pub tag_vocabulary: PathBuf,
}

impl ArtifactPaths {
    pub const METADATA_FILE: &'static str = "metadata.csv";
    pub const TITLE_EMBEDDINGS_FILE: &'static str = "title_embeddings.csv";
    pub const WORD_VECTORS_FILE: &'static str = "word_vectors.txt";
    pub const TOKENIZER_FILE: &'static str = "tokenizer.json";
    pub const CLASSIFIER_FILE: &'static str = "tag_classifier.json";
    pub const TAG_VOCABULARY_FILE: &'static str = "tags.json";

    /// Standard file names inside one directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            metadata: dir.join(Self::METADATA_FILE),
            title_embeddings: dir.join(Self::TITLE_EMBEDDINGS_FILE),
            word_vectors: dir.join(Self::WORD_VECTORS_FILE),
            tokenizer: dir.join(Self::TOKENIZER_FILE),
            classifier: dir.join(Self::CLASSIFIER_FILE),
            tag_vocabulary: dir.join(Self::TAG_VOCABULARY_FILE),
        }
    }

    /// Resolve the artifact directory
    ///
    /// Uses the explicit directory if given, then `STACKSEARCH_DATA_DIR`,
    /// then the platform data directory.
    pub fn resolve(dir: Option<PathBuf>) -> Result<Self, ConfigError> {
        resolve_data_dir(dir).map(Self::in_dir)
    }

    /// Every path with a short label, in load order
    pub fn entries(&self) -> [(&'static str, &Path); 6] {
        [
            ("metadata", self.metadata.as_path()),
            ("title embeddings", self.title_embeddings.as_path()),
            ("word vectors", self.word_vectors.as_path()),
            ("tokenizer", self.tokenizer.as_path()),
            ("classifier", self.classifier.as_path()),
            ("tag vocabulary", self.tag_vocabulary.as_path()),
        ]
    }

    /// Artifacts that do not exist on disk
    pub fn missing(&self) -> Vec<(&'static str, &Path)> {
        self.entries()
            .into_iter()
            .filter(|(_, path)| !path.exists())
            .collect()
    }
}

/// Pick the artifact directory
pub fn resolve_data_dir(dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = dir {
        return Ok(dir);
    }

    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Linux: ~/.local/share/stacksearch
    // macOS: ~/Library/Application Support/org.stacksearch.stacksearch
    directories::ProjectDirs::from("org", "stacksearch", "stacksearch")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(ConfigError::NoDataDir)
}

// ============================================================================
// TESTS
// ============================================================================
