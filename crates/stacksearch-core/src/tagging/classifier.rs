//! Multi-label Tag Classifier
//!
//! A small feed-forward network exported from the training notebook:
//!
//! ```text
//! token indices -> embedding -> global pooling -> dense* -> sigmoid per tag
//! ```
//!
//! The model is immutable once built. Forward passes run through an
//! [`InferenceSession`] that owns its own scratch buffers, so any number of
//! requests can classify concurrently against one shared model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::TaggingError;

// ============================================================================
// LAYER TYPES
// ============================================================================

/// Element-wise activation of a dense layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    #[inline]
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Linear => x,
            Activation::Relu => x.max(0.0),
            Activation::Sigmoid => sigmoid(x),
            Activation::Tanh => x.tanh(),
        }
    }
}

/// Numerically stable logistic function
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// How the embedded sequence is reduced to one vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    /// Mean over every position, padding included
    #[default]
    Average,
    /// Component-wise maximum over every position
    Max,
}

/// Fully connected layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Shape `[inputs][units]`
    pub kernel: Vec<Vec<f32>>,
    /// Shape `[units]`
    pub bias: Vec<f32>,
    pub activation: Activation,
}

impl DenseLayer {
    fn units(&self) -> usize {
        self.bias.len()
    }
}

/// Serialized network weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierWeights {
    /// Shape `[vocabulary][embedding_dim]`; row 0 is the padding vector
    pub embedding: Vec<Vec<f32>>,
    #[serde(default)]
    pub pooling: Pooling,
    pub dense: Vec<DenseLayer>,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Validated, immutable tag classifier
#[derive(Debug, Clone)]
pub struct TagClassifier {
    weights: ClassifierWeights,
    embedding_dim: usize,
    max_width: usize,
}

impl TagClassifier {
    /// Validate layer shapes and build the classifier
    pub fn new(weights: ClassifierWeights) -> Result<Self, TaggingError> {
        let embedding_dim = weights
            .embedding
            .first()
            .map(Vec::len)
            .filter(|d| *d > 0)
            .ok_or_else(|| TaggingError::InvalidModel("embedding matrix is empty".to_string()))?;

        for (row, vector) in weights.embedding.iter().enumerate() {
            if vector.len() != embedding_dim {
                return Err(TaggingError::ShapeMismatch {
                    layer: "embedding".to_string(),
                    message: format!(
                        "row {} has {} components, expected {}",
                        row,
                        vector.len(),
                        embedding_dim
                    ),
                });
            }
            ensure_finite("embedding", vector)?;
        }

        let last = weights
            .dense
            .last()
            .ok_or_else(|| TaggingError::InvalidModel("network has no dense layers".to_string()))?;
        if last.activation != Activation::Sigmoid {
            return Err(TaggingError::InvalidModel(format!(
                "output layer must use sigmoid for multi-label output, found {:?}",
                last.activation
            )));
        }

        let mut width = embedding_dim;
        let mut max_width = embedding_dim;
        for (i, layer) in weights.dense.iter().enumerate() {
            let name = format!("dense_{}", i);
            if layer.units() == 0 {
                return Err(TaggingError::ShapeMismatch {
                    layer: name,
                    message: "bias is empty".to_string(),
                });
            }
            if layer.kernel.len() != width {
                return Err(TaggingError::ShapeMismatch {
                    layer: name,
                    message: format!("kernel has {} input rows, expected {}", layer.kernel.len(), width),
                });
            }
            for row in &layer.kernel {
                if row.len() != layer.units() {
                    return Err(TaggingError::ShapeMismatch {
                        layer: name,
                        message: format!(
                            "kernel row has {} units but bias has {}",
                            row.len(),
                            layer.units()
                        ),
                    });
                }
                ensure_finite(&name, row)?;
            }
            ensure_finite(&name, &layer.bias)?;
            width = layer.units();
            max_width = max_width.max(width);
        }

        Ok(Self {
            weights,
            embedding_dim,
            max_width,
        })
    }

    /// Load classifier weights from JSON
    pub fn load(path: &Path) -> Result<Self, TaggingError> {
        let file = File::open(path)?;
        let weights: ClassifierWeights = serde_json::from_reader(BufReader::new(file))?;
        let classifier = Self::new(weights)?;
        info!(
            path = %path.display(),
            vocabulary = classifier.vocabulary_size(),
            embedding_dim = classifier.embedding_dim(),
            dense_layers = classifier.weights.dense.len(),
            outputs = classifier.output_width(),
            "Loaded tag classifier"
        );
        Ok(classifier)
    }

    /// Number of embedding rows (valid token indices are below this)
    pub fn vocabulary_size(&self) -> usize {
        self.weights.embedding.len()
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Number of probabilities produced per input
    pub fn output_width(&self) -> usize {
        self.weights.dense.last().map(DenseLayer::units).unwrap_or(0)
    }

    /// Start a request-scoped inference session
    pub fn session(&self) -> InferenceSession<'_> {
        InferenceSession {
            model: self,
            current: Vec::with_capacity(self.max_width),
            next: Vec::with_capacity(self.max_width),
        }
    }

    /// One-shot forward pass with a throwaway session
    pub fn predict_proba(&self, sequence: &[usize]) -> Vec<f32> {
        self.session().forward(sequence).to_vec()
    }
}

fn ensure_finite(layer: &str, values: &[f32]) -> Result<(), TaggingError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(TaggingError::InvalidModel(format!("{} contains non-finite weights", layer)))
    }
}

// ============================================================================
// INFERENCE SESSION
// ============================================================================

/// Per-request execution state borrowed against an immutable model
pub struct InferenceSession<'m> {
    model: &'m TagClassifier,
    current: Vec<f32>,
    next: Vec<f32>,
}

impl<'m> InferenceSession<'m> {
    /// The model this session runs
    pub fn model(&self) -> &'m TagClassifier {
        self.model
    }

    /// Run the network over a token-index sequence
    ///
    /// Returns one probability per output tag. Indices outside the embedding
    /// matrix contribute a zero vector.
    pub fn forward(&mut self, sequence: &[usize]) -> &[f32] {
        self.pool(sequence);

        let model = self.model;
        for layer in &model.weights.dense {
            self.next.clear();
            self.next.resize(layer.units(), 0.0);
            for (x, row) in self.current.iter().zip(&layer.kernel) {
                if *x == 0.0 {
                    continue;
                }
                for (acc, w) in self.next.iter_mut().zip(row) {
                    *acc += x * w;
                }
            }
            for (acc, b) in self.next.iter_mut().zip(&layer.bias) {
                *acc = layer.activation.apply(*acc + b);
            }
            std::mem::swap(&mut self.current, &mut self.next);
        }

        &self.current
    }

    fn pool(&mut self, sequence: &[usize]) {
        let model = self.model;
        let dim = model.embedding_dim;
        let embedding = &model.weights.embedding;
        let zeros = vec![0.0_f32; dim];
        let row = |index: usize| embedding.get(index).map(Vec::as_slice).unwrap_or(zeros.as_slice());

        self.current.clear();
        if sequence.is_empty() {
            self.current.resize(dim, 0.0);
            return;
        }

        match model.weights.pooling {
            Pooling::Average => {
                self.current.resize(dim, 0.0);
                for &index in sequence {
                    for (acc, v) in self.current.iter_mut().zip(row(index)) {
                        *acc += v;
                    }
                }
                let count = sequence.len() as f32;
                for acc in &mut self.current {
                    *acc /= count;
                }
            }
            Pooling::Max => {
                self.current.resize(dim, f32::NEG_INFINITY);
                for &index in sequence {
                    for (acc, v) in self.current.iter_mut().zip(row(index)) {
                        *acc = acc.max(*v);
                    }
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
