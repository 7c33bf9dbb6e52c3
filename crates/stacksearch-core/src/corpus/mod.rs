//! Corpus Module
//!
//! The fixed question corpus searched by the ranker:
//! - Metadata table (titles, bodies, URLs, popularity, sentiment)
//! - Precomputed title-embedding matrix, aligned row-for-row with the metadata
//!
//! Both halves are joined into one [`CorpusItem`] per row when loading, so
//! the alignment is checked once and cannot drift afterwards.

mod item;
mod loader;

use std::path::Path;

use tracing::info;

pub use item::{split_tags, CorpusItem, MetadataRecord};
pub use loader::{read_metadata, read_metadata_from, read_title_embeddings, read_title_embeddings_from};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Corpus loading error types
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// CSV parse or IO error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A cell that must be a finite number is not
    #[error("Invalid value at row {row}, column {column}: '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    /// Metadata and embedding matrix disagree on the number of rows
    #[error("Row count mismatch: metadata has {metadata} rows, title embeddings have {embeddings}")]
    RowCountMismatch { metadata: usize, embeddings: usize },
    /// An embedding row has a different width than the first row
    #[error("Dimension mismatch at row {row}: expected {expected}, got {got}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// No rows to search
    #[error("Corpus is empty")]
    Empty,
}

/// Corpus result type
pub type Result<T> = std::result::Result<T, CorpusError>;

// ============================================================================
// CORPUS
// ============================================================================

/// Ordered, immutable collection of corpus items
#[derive(Debug, Clone)]
pub struct Corpus {
    items: Vec<CorpusItem>,
    dimensions: usize,
}

impl Corpus {
    /// Join metadata rows with their title embeddings
    ///
    /// Row `i` of `records` is paired with row `i` of `embeddings`. The
    /// counts must match and every embedding must have the same width.
    pub fn from_parts(records: Vec<MetadataRecord>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if records.len() != embeddings.len() {
            return Err(CorpusError::RowCountMismatch {
                metadata: records.len(),
                embeddings: embeddings.len(),
            });
        }

        let dimensions = embeddings.first().map(Vec::len).ok_or(CorpusError::Empty)?;
        if dimensions == 0 {
            return Err(CorpusError::DimensionMismatch {
                row: 0,
                expected: 1,
                got: 0,
            });
        }

        let mut items = Vec::with_capacity(records.len());
        for (row, (record, embedding)) in records.into_iter().zip(embeddings).enumerate() {
            if embedding.len() != dimensions {
                return Err(CorpusError::DimensionMismatch {
                    row,
                    expected: dimensions,
                    got: embedding.len(),
                });
            }
            items.push(CorpusItem::new(record, embedding));
        }

        Ok(Self { items, dimensions })
    }

    /// Load and join the metadata table and title-embedding matrix
    pub fn load(metadata_path: &Path, embeddings_path: &Path) -> Result<Self> {
        let records = read_metadata(metadata_path)?;
        let embeddings = read_title_embeddings(embeddings_path)?;
        let corpus = Self::from_parts(records, embeddings)?;

        info!(
            metadata = %metadata_path.display(),
            embeddings = %embeddings_path.display(),
            items = corpus.len(),
            dimensions = corpus.dimensions(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// All items in corpus order
    pub fn items(&self) -> &[CorpusItem] {
        &self.items
    }

    /// Item at a corpus index
    pub fn get(&self, index: usize) -> Option<&CorpusItem> {
        self.items.get(index)
    }

    /// Iterate items in corpus order
    pub fn iter(&self) -> std::slice::Iter<'_, CorpusItem> {
        self.items.iter()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the corpus is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Title-embedding dimension
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a CorpusItem;
    type IntoIter = std::slice::Iter<'a, CorpusItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================
