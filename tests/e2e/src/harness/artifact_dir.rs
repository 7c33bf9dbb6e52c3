//! Test Artifact Directory
//!
//! Writes a complete artifact set in the on-disk formats the service reads,
//! so journeys exercise the real loaders:
//! - metadata.csv and title_embeddings.csv
//! - word2vec text word vectors
//! - tokenizer, classifier and tag vocabulary JSON

use std::fs;
use std::path::Path;

use stacksearch_core::{ArtifactPaths, LoadError, SearchConfig, SearchEngine, TagVocabulary};
use tempfile::TempDir;

use crate::mocks::{FixtureFactory, QuestionFixture, TagModelFixture};

/// Isolated artifact directory, deleted when dropped
///
/// # Example
///
/// ```rust,ignore
/// let dir = TestArtifactDir::new_temp();
/// let engine = dir.load_engine();
/// let response = engine.search("test query", 2);
/// ```
pub struct TestArtifactDir {
    /// Temporary directory (kept alive to prevent premature deletion)
    temp_dir: TempDir,
    paths: ArtifactPaths,
}

impl TestArtifactDir {
    /// Directory with the three-item scenario and the fixture tag model
    pub fn new_temp() -> Self {
        Self::with_corpus(&FixtureFactory::three_item_scenario())
    }

    /// Directory with a custom corpus and the fixture word vectors and tag model
    pub fn with_corpus(items: &[QuestionFixture]) -> Self {
        let dir = Self::empty();
        dir.write_metadata(items);
        dir.write_title_embeddings(&items.iter().map(|q| q.embedding.clone()).collect::<Vec<_>>());
        dir.write_word_vectors(&FixtureFactory::word_vectors());
        dir.write_tag_model(&FixtureFactory::tag_model());
        dir
    }

    /// Directory with no artifacts
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let paths = ArtifactPaths::in_dir(temp_dir.path());
        Self { temp_dir, paths }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Load the engine through the production loader
    pub fn try_load(&self) -> Result<SearchEngine, LoadError> {
        SearchEngine::load(&self.paths, SearchConfig::default())
    }

    /// Load the engine, panicking on failure
    pub fn load_engine(&self) -> SearchEngine {
        self.try_load().expect("Failed to load fixture artifacts")
    }

    pub fn write_metadata(&self, items: &[QuestionFixture]) {
        let mut writer =
            csv::Writer::from_path(&self.paths.metadata).expect("Failed to create metadata.csv");
        writer
            .write_record([
                "original_title",
                "title",
                "question_content",
                "question_url",
                "overall_scores",
                "overall_scores_norm",
                "sentiment_polarity",
                "tags",
            ])
            .expect("Failed to write header");
        for q in items {
            writer
                .write_record([
                    q.display_title.clone(),
                    q.title.clone(),
                    q.body.clone(),
                    q.url.clone(),
                    q.votes.to_string(),
                    q.popularity_norm.to_string(),
                    q.sentiment_polarity.to_string(),
                    q.tags.join("|"),
                ])
                .expect("Failed to write metadata row");
        }
        writer.flush().expect("Failed to flush metadata.csv");
    }

    pub fn write_title_embeddings(&self, rows: &[Vec<f32>]) {
        let mut writer = csv::Writer::from_path(&self.paths.title_embeddings)
            .expect("Failed to create title_embeddings.csv");
        let width = rows.first().map(Vec::len).unwrap_or(FixtureFactory::DIMENSIONS);
        writer
            .write_record((0..width).map(|i| i.to_string()))
            .expect("Failed to write header");
        for row in rows {
            writer
                .write_record(row.iter().map(|v| v.to_string()))
                .expect("Failed to write embedding row");
        }
        writer.flush().expect("Failed to flush title_embeddings.csv");
    }

    pub fn write_word_vectors(&self, entries: &[(String, Vec<f32>)]) {
        let dimensions = entries.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut text = format!("{} {}\n", entries.len(), dimensions);
        for (word, vector) in entries {
            let values: Vec<String> = vector.iter().map(|v| v.to_string()).collect();
            text.push_str(&format!("{} {}\n", word, values.join(" ")));
        }
        fs::write(&self.paths.word_vectors, text).expect("Failed to write word vectors");
    }

    pub fn write_tag_model(&self, model: &TagModelFixture) {
        let tokenizer = serde_json::to_string(&model.tokenizer).expect("tokenizer serializes");
        fs::write(&self.paths.tokenizer, tokenizer).expect("Failed to write tokenizer");

        let classifier = serde_json::to_string(&model.classifier).expect("classifier serializes");
        fs::write(&self.paths.classifier, classifier).expect("Failed to write classifier");

        TagVocabulary::new(model.tags.clone())
            .expect("fixture tags are valid")
            .save(&self.paths.tag_vocabulary)
            .expect("Failed to write tag vocabulary");
    }

    /// Replace one artifact with arbitrary contents
    pub fn overwrite(&self, path: &Path, contents: &str) {
        fs::write(path, contents).expect("Failed to overwrite artifact");
    }
}
