//! Tag prediction pipeline: tokenize, pad, classify, threshold

use serde::{Deserialize, Serialize};

use super::classifier::{InferenceSession, TagClassifier};
use super::loss::sample_loss;
use super::tokenizer::SequenceTokenizer;
use super::vocabulary::TagVocabulary;
use super::TaggingError;

/// Fixed per-tag decision threshold; a tag is emitted when its probability is above it
pub const TAG_THRESHOLD: f32 = 0.5;

/// Predicts topic tags for free text
#[derive(Debug, Clone)]
pub struct TagPredictor {
    tokenizer: SequenceTokenizer,
    classifier: TagClassifier,
    vocabulary: TagVocabulary,
    max_sequence_length: usize,
}

impl TagPredictor {
    /// Assemble a predictor, checking that the three artifacts agree
    pub fn new(
        tokenizer: SequenceTokenizer,
        classifier: TagClassifier,
        vocabulary: TagVocabulary,
        max_sequence_length: usize,
    ) -> Result<Self, TaggingError> {
        if max_sequence_length == 0 {
            return Err(TaggingError::InvalidModel(
                "max_sequence_length must be at least 1".to_string(),
            ));
        }
        if classifier.output_width() != vocabulary.len() {
            return Err(TaggingError::InvalidModel(format!(
                "classifier emits {} probabilities but the tag vocabulary has {} tags",
                classifier.output_width(),
                vocabulary.len()
            )));
        }
        if tokenizer.vocabulary_bound() > classifier.vocabulary_size() {
            return Err(TaggingError::InvalidModel(format!(
                "tokenizer emits indices up to {} but the classifier embeds only {} rows",
                tokenizer.vocabulary_bound() - 1,
                classifier.vocabulary_size()
            )));
        }

        Ok(Self {
            tokenizer,
            classifier,
            vocabulary,
            max_sequence_length,
        })
    }

    /// Start a request-scoped inference session
    pub fn session(&self) -> InferenceSession<'_> {
        self.classifier.session()
    }

    /// Per-tag probabilities for `text`, in vocabulary order
    pub fn probabilities(&self, session: &mut InferenceSession<'_>, text: &str) -> Vec<f32> {
        let sequence = self.tokenizer.encode(text, self.max_sequence_length);
        session.forward(&sequence).to_vec()
    }

    /// Predict tags using a caller-provided session
    pub fn predict_with(&self, session: &mut InferenceSession<'_>, text: &str) -> Vec<String> {
        let probabilities = self.probabilities(session, text);
        self.vocabulary.decode(&probabilities, TAG_THRESHOLD)
    }

    /// Predict tags with a fresh session
    pub fn predict(&self, text: &str) -> Vec<String> {
        let mut session = self.session();
        self.predict_with(&mut session, text)
    }

    /// Score the predictor against labelled samples
    ///
    /// Sample text must already be preprocessed the same way queries are.
    pub fn evaluate<S: AsRef<str>>(&self, samples: &[(S, Vec<String>)]) -> TagEvaluation {
        let mut session = self.session();
        let mut total_loss = 0.0_f32;
        let mut true_positives = 0_usize;
        let mut predicted = 0_usize;
        let mut actual = 0_usize;

        for (text, tags) in samples {
            let probabilities = self.probabilities(&mut session, text.as_ref());
            let target = self.vocabulary.encode(tags);
            total_loss += sample_loss(&target, &probabilities);

            for (p, t) in probabilities.iter().zip(&target) {
                let hit = *p > TAG_THRESHOLD;
                let relevant = *t > 0.5;
                predicted += usize::from(hit);
                actual += usize::from(relevant);
                true_positives += usize::from(hit && relevant);
            }
        }

        let ratio = |num: usize, den: usize| {
            if den == 0 {
                0.0
            } else {
                num as f32 / den as f32
            }
        };
        let mean_loss = if samples.is_empty() {
            0.0
        } else {
            total_loss / samples.len() as f32
        };

        TagEvaluation {
            samples: samples.len(),
            mean_loss,
            precision: ratio(true_positives, predicted),
            recall: ratio(true_positives, actual),
        }
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    pub fn classifier(&self) -> &TagClassifier {
        &self.classifier
    }

    pub fn tokenizer(&self) -> &SequenceTokenizer {
        &self.tokenizer
    }

    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }
}

/// Aggregate tag-prediction quality over a labelled sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagEvaluation {
    pub samples: usize,
    /// Mean summed binary cross-entropy per sample
    pub mean_loss: f32,
    /// Micro-averaged precision at the fixed threshold
    pub precision: f32,
    /// Micro-averaged recall at the fixed threshold
    pub recall: f32,
}
