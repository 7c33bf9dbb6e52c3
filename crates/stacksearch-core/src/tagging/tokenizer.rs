//! Classifier Tokenizer
//!
//! Maps text to the integer sequences the tag classifier was trained on.
//! Follows the Keras `Tokenizer` conventions the vocabulary was built with:
//! lowercase, replace filter characters with the split character, split,
//! look each word up in `word_index`. Index 0 is reserved for padding.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::TaggingError;

/// Characters removed before splitting, matching the Keras default
pub const DEFAULT_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

fn default_lower() -> bool {
    true
}

fn default_filters() -> String {
    DEFAULT_FILTERS.to_string()
}

fn default_split() -> String {
    " ".to_string()
}

/// Serialized tokenizer vocabulary and options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Word to 1-based index
    pub word_index: HashMap<String, usize>,
    /// Only indices below this are kept
    #[serde(default)]
    pub num_words: Option<usize>,
    /// Replacement token for unknown words
    #[serde(default)]
    pub oov_token: Option<String>,
    #[serde(default = "default_lower")]
    pub lower: bool,
    #[serde(default = "default_filters")]
    pub filters: String,
    #[serde(default = "default_split")]
    pub split: String,
}

impl TokenizerConfig {
    /// Vocabulary with default options
    pub fn from_word_index(word_index: HashMap<String, usize>) -> Self {
        Self {
            word_index,
            num_words: None,
            oov_token: None,
            lower: default_lower(),
            filters: default_filters(),
            split: default_split(),
        }
    }
}

/// Text to padded index-sequence encoder
#[derive(Debug, Clone)]
pub struct SequenceTokenizer {
    config: TokenizerConfig,
    filters: HashSet<char>,
    oov_index: Option<usize>,
    vocabulary_bound: usize,
}

impl SequenceTokenizer {
    /// Validate a vocabulary and build the tokenizer
    pub fn new(config: TokenizerConfig) -> Result<Self, TaggingError> {
        if config.word_index.is_empty() {
            return Err(TaggingError::InvalidTokenizer("word_index is empty".to_string()));
        }
        if let Some((word, _)) = config.word_index.iter().find(|(_, index)| **index == 0) {
            return Err(TaggingError::InvalidTokenizer(format!(
                "word '{}' uses index 0, which is reserved for padding",
                word
            )));
        }
        if config.split.is_empty() {
            return Err(TaggingError::InvalidTokenizer("split must not be empty".to_string()));
        }

        let oov_index = match &config.oov_token {
            Some(token) => Some(*config.word_index.get(token).ok_or_else(|| {
                TaggingError::InvalidTokenizer(format!("oov_token '{}' is not in word_index", token))
            })?),
            None => None,
        };

        let max_index = config.word_index.values().copied().max().unwrap_or(0);
        let vocabulary_bound = match config.num_words {
            Some(n) => n.min(max_index + 1),
            None => max_index + 1,
        };

        let filters = config.filters.chars().collect();

        Ok(Self {
            config,
            filters,
            oov_index,
            vocabulary_bound,
        })
    }

    /// Load a tokenizer vocabulary from JSON
    pub fn load(path: &Path) -> Result<Self, TaggingError> {
        let file = File::open(path)?;
        let config: TokenizerConfig = serde_json::from_reader(BufReader::new(file))?;
        let tokenizer = Self::new(config)?;
        info!(
            path = %path.display(),
            words = tokenizer.config.word_index.len(),
            vocabulary_bound = tokenizer.vocabulary_bound,
            "Loaded tokenizer"
        );
        Ok(tokenizer)
    }

    /// Exclusive upper bound of any index this tokenizer emits
    pub fn vocabulary_bound(&self) -> usize {
        self.vocabulary_bound
    }

    /// Split text into words after lowercasing and filtering
    pub fn text_to_words(&self, text: &str) -> Vec<String> {
        let text = if self.config.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let mut replaced = String::with_capacity(text.len());
        for c in text.chars() {
            if self.filters.contains(&c) {
                replaced.push_str(&self.config.split);
            } else {
                replaced.push(c);
            }
        }
        replaced
            .split(self.config.split.as_str())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Map text to vocabulary indices, dropping words the model never saw
    pub fn text_to_sequence(&self, text: &str) -> Vec<usize> {
        let mut sequence = Vec::new();
        for word in self.text_to_words(text) {
            match self.config.word_index.get(&word) {
                Some(&index) if index < self.vocabulary_bound => sequence.push(index),
                _ => {
                    if let Some(oov) = self.oov_index {
                        sequence.push(oov);
                    }
                }
            }
        }
        sequence
    }

    /// Encode text to exactly `max_len` indices
    pub fn encode(&self, text: &str, max_len: usize) -> Vec<usize> {
        pad_sequence(&self.text_to_sequence(text), max_len)
    }
}

/// Left-pad with zeros or keep the last `max_len` items
///
/// Both padding and truncation happen at the front of the sequence.
pub fn pad_sequence(sequence: &[usize], max_len: usize) -> Vec<usize> {
    if sequence.len() >= max_len {
        return sequence[sequence.len() - max_len..].to_vec();
    }
    let mut padded = vec![0; max_len - sequence.len()];
    padded.extend_from_slice(sequence);
    padded
}
