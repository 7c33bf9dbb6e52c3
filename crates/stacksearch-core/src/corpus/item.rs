//! Corpus item types

use serde::Deserialize;

use crate::embeddings::l2_norm;

/// One row of the question metadata table
///
/// Column names follow the preprocessed dataset export.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataRecord {
    /// Title as shown to users
    #[serde(rename = "original_title")]
    pub display_title: String,
    /// Preprocessed title the title embedding was computed from
    pub title: String,
    /// Question body text
    #[serde(rename = "question_content")]
    pub body: String,
    /// Link to the question
    #[serde(rename = "question_url")]
    pub url: String,
    /// Raw vote/score count
    #[serde(rename = "overall_scores")]
    pub votes: f64,
    /// Normalized popularity in a range comparable across items
    #[serde(rename = "overall_scores_norm")]
    pub popularity_norm: f32,
    /// Sentiment polarity of the question
    pub sentiment_polarity: f32,
    /// Pipe-separated tag list, when the export carries one
    #[serde(default)]
    pub tags: Option<String>,
}

/// A corpus row with its metadata joined to its title embedding
///
/// Built once at load time. Holding both halves in one record is what keeps
/// row `i` of the embedding matrix attached to row `i` of the metadata.
#[derive(Debug, Clone)]
pub struct CorpusItem {
    pub title: String,
    pub display_title: String,
    pub body: String,
    pub url: String,
    pub votes: f64,
    pub popularity_norm: f32,
    pub sentiment_polarity: f32,
    pub tags: Vec<String>,
    title_embedding: Vec<f32>,
    title_norm: f32,
}

impl CorpusItem {
    /// Join a metadata record with its title embedding
    pub fn new(record: MetadataRecord, title_embedding: Vec<f32>) -> Self {
        let tags = record
            .tags
            .as_deref()
            .map(split_tags)
            .unwrap_or_default();
        let title_norm = l2_norm(&title_embedding);

        Self {
            title: record.title,
            display_title: record.display_title,
            body: record.body,
            url: record.url,
            votes: record.votes,
            popularity_norm: record.popularity_norm,
            sentiment_polarity: record.sentiment_polarity,
            tags,
            title_embedding,
            title_norm,
        }
    }

    /// Precomputed title embedding
    pub fn title_embedding(&self) -> &[f32] {
        &self.title_embedding
    }

    /// Magnitude of the title embedding
    pub fn title_norm(&self) -> f32 {
        self.title_norm
    }
}

/// Split a `a|b|c` tag cell into tags, dropping empty entries
pub fn split_tags(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
