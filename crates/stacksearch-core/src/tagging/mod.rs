//! Tagging Module
//!
//! Multi-label topic-tag prediction for free text:
//! - Keras-compatible tokenizer with front padding and truncation
//! - Embedding + pooling + dense classifier with per-tag sigmoid outputs
//! - Ordered tag vocabulary and threshold decoding
//! - Training objective, reused for offline evaluation

mod classifier;
mod loss;
mod predictor;
mod tokenizer;
mod vocabulary;

pub use classifier::{
    sigmoid, Activation, ClassifierWeights, DenseLayer, InferenceSession, Pooling, TagClassifier,
};
pub use loss::{multitask_loss, sample_loss, LOSS_EPSILON};
pub use predictor::{TagEvaluation, TagPredictor, TAG_THRESHOLD};
pub use tokenizer::{pad_sequence, SequenceTokenizer, TokenizerConfig, DEFAULT_FILTERS};
pub use vocabulary::TagVocabulary;

/// Tagging artifact error types
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TaggingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Tokenizer vocabulary is unusable
    #[error("Invalid tokenizer: {0}")]
    InvalidTokenizer(String),
    /// Classifier weights are unusable or inconsistent with the other artifacts
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    /// A weight matrix has the wrong shape
    #[error("Shape mismatch in {layer}: {message}")]
    ShapeMismatch { layer: String, message: String },
    /// Tag list is empty or has duplicates
    #[error("Invalid tag vocabulary: {0}")]
    InvalidVocabulary(String),
}
