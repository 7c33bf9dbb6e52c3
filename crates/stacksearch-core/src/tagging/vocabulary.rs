//! Tag Vocabulary
//!
//! The ordered list of tags the classifier predicts over. Position `i` in
//! the vocabulary names output `i` of the network.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::info;

use super::TaggingError;

/// Ordered, duplicate-free list of tag names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TagVocabulary {
    /// Build a vocabulary from tags in output order
    pub fn new(tags: Vec<String>) -> Result<Self, TaggingError> {
        if tags.is_empty() {
            return Err(TaggingError::InvalidVocabulary("no tags".to_string()));
        }
        let mut positions = HashMap::with_capacity(tags.len());
        for (i, tag) in tags.iter().enumerate() {
            if tag.is_empty() {
                return Err(TaggingError::InvalidVocabulary(format!("tag {} is empty", i)));
            }
            if positions.insert(tag.clone(), i).is_some() {
                return Err(TaggingError::InvalidVocabulary(format!("duplicate tag '{}'", tag)));
            }
        }
        Ok(Self { tags, positions })
    }

    /// Derive the vocabulary from per-question tag lists
    ///
    /// Keeps the `top_n` most frequent tags (ties go to the tag seen first),
    /// then orders them lexicographically, which is the column order the
    /// classifier's label binarizer produced at training time.
    pub fn from_tag_lists<I, L, S>(tag_lists: I, top_n: usize) -> Result<Self, TaggingError>
    where
        I: IntoIterator<Item = L>,
        L: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut seen = 0_usize;
        for list in tag_lists {
            for tag in list {
                let tag = tag.as_ref();
                if tag.is_empty() {
                    continue;
                }
                match counts.get_mut(tag) {
                    Some((count, _)) => *count += 1,
                    None => {
                        counts.insert(tag.to_string(), (1, seen));
                        seen += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(tag, (count, first_seen))| (tag, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(top_n);

        let mut tags: Vec<String> = ranked.into_iter().map(|(tag, _, _)| tag).collect();
        tags.sort();
        Self::new(tags)
    }

    /// Load a JSON array of tag names
    pub fn load(path: &Path) -> Result<Self, TaggingError> {
        let file = File::open(path)?;
        let tags: Vec<String> = serde_json::from_reader(BufReader::new(file))?;
        let vocabulary = Self::new(tags)?;
        info!(path = %path.display(), tags = vocabulary.len(), "Loaded tag vocabulary");
        Ok(vocabulary)
    }

    /// Write the vocabulary as a JSON array
    pub fn save(&self, path: &Path) -> Result<(), TaggingError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.tags)?;
        Ok(())
    }

    /// Tags whose probability is strictly above `threshold`, in vocabulary order
    pub fn decode(&self, probabilities: &[f32], threshold: f32) -> Vec<String> {
        self.tags
            .iter()
            .zip(probabilities)
            .filter(|(_, p)| **p > threshold)
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Multi-hot target vector; unknown tags are ignored
    pub fn encode<S: AsRef<str>>(&self, tags: &[S]) -> Vec<f32> {
        let mut target = vec![0.0; self.tags.len()];
        let wanted: HashSet<&str> = tags.iter().map(AsRef::as_ref).collect();
        for tag in wanted {
            if let Some(&i) = self.positions.get(tag) {
                target[i] = 1.0;
            }
        }
        target
    }

    /// Position of a tag
    pub fn position(&self, tag: &str) -> Option<usize> {
        self.positions.get(tag).copied()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
