//! Pretrained Word-Vector Table
//!
//! Read-only `word -> vector` lookup loaded once at startup from a word2vec
//! text export. Every vector in a table has the same dimension.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Word-vector table error types
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// IO error while reading the vector file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A line could not be parsed as `word v1 v2 ...`
    #[error("Malformed vector on line {line}: {message}")]
    Malformed { line: usize, message: String },
    /// A vector does not match the table dimension
    #[error("Dimension mismatch for '{word}': expected {expected}, got {got}")]
    DimensionMismatch {
        word: String,
        expected: usize,
        got: usize,
    },
    /// No vectors were found
    #[error("Word-vector table is empty")]
    Empty,
}

// ============================================================================
// EMBEDDING TABLE
// ============================================================================

/// Immutable mapping from word to fixed-dimension vector
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dimensions: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    /// Create an empty table for vectors of `dimensions` components
    pub fn new(dimensions: usize) -> Self {
        Self::with_capacity(dimensions, 0)
    }

    fn with_capacity(dimensions: usize, capacity: usize) -> Self {
        Self {
            dimensions,
            vectors: HashMap::with_capacity(capacity),
        }
    }

    /// Build a table from `(word, vector)` pairs
    pub fn from_entries<I, S>(dimensions: usize, entries: I) -> Result<Self, EmbeddingError>
    where
        I: IntoIterator<Item = (S, Vec<f32>)>,
        S: Into<String>,
    {
        let mut table = Self::new(dimensions);
        for (word, vector) in entries {
            table.insert(word, vector)?;
        }
        Ok(table)
    }

    /// Insert a vector, rejecting any dimension other than the table's
    ///
    /// A repeated word replaces the earlier vector, matching how word2vec
    /// loaders treat duplicate rows.
    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<(), EmbeddingError> {
        let word = word.into();
        if vector.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                word,
                expected: self.dimensions,
                got: vector.len(),
            });
        }
        self.vectors.insert(word, vector);
        Ok(())
    }

    /// Look up the vector for a word
    #[inline]
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Check whether a word has a vector
    pub fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    /// Vector dimension shared by every entry
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of words in the table
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Load a word2vec text file
    pub fn load(path: &Path) -> Result<Self, EmbeddingError> {
        let file = File::open(path)?;
        let table = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            words = table.len(),
            dimensions = table.dimensions(),
            "Loaded word vectors"
        );
        Ok(table)
    }

    /// Parse word2vec text format
    ///
    /// The optional `<count> <dimensions>` header on the first line is
    /// detected and used to presize the table. Without a header the first
    /// vector fixes the dimension.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, EmbeddingError> {
        let mut table: Option<EmbeddingTable> = None;
        let mut declared_count: Option<usize> = None;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;

            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let rest: Vec<&str> = parts.collect();

            if idx == 0 && rest.len() == 1 {
                if let (Ok(count), Ok(dimensions)) = (word.parse::<usize>(), rest[0].parse::<usize>()) {
                    debug!(count, dimensions, "word2vec header");
                    declared_count = Some(count);
                    table = Some(Self::with_capacity(dimensions, count));
                    continue;
                }
            }

            if rest.is_empty() {
                return Err(EmbeddingError::Malformed {
                    line: line_no,
                    message: format!("word '{}' has no vector components", word),
                });
            }

            let vector = rest
                .iter()
                .map(|value| parse_component(value, line_no))
                .collect::<Result<Vec<f32>, _>>()?;

            table
                .get_or_insert_with(|| Self::new(vector.len()))
                .insert(word, vector)?;
        }

        let table = table.filter(|t| !t.is_empty()).ok_or(EmbeddingError::Empty)?;

        if let Some(count) = declared_count {
            if count != table.len() {
                warn!(
                    declared = count,
                    loaded = table.len(),
                    "word2vec header count differs from rows loaded"
                );
            }
        }

        Ok(table)
    }
}

fn parse_component(value: &str, line: usize) -> Result<f32, EmbeddingError> {
    let parsed: f32 = value.parse().map_err(|e| EmbeddingError::Malformed {
        line,
        message: format!("'{}': {}", value, e),
    })?;
    if !parsed.is_finite() {
        return Err(EmbeddingError::Malformed {
            line,
            message: format!("non-finite component '{}'", value),
        });
    }
    Ok(parsed)
}

// ============================================================================
// TESTS
// ============================================================================
