//! Fixture Factory
//!
//! Small, hand-checkable artifacts:
//! - Question corpora whose title embeddings sit at known cosines from the
//!   query direction `[1, 0]`
//! - A 2-dimensional word-vector table
//! - A tag model whose outputs are easy to reason about

use stacksearch_core::tagging::{
    Activation, ClassifierWeights, DenseLayer, Pooling, TokenizerConfig,
};

/// One corpus row with its title embedding
#[derive(Debug, Clone)]
pub struct QuestionFixture {
    pub display_title: String,
    pub title: String,
    pub body: String,
    pub url: String,
    pub votes: f64,
    pub popularity_norm: f32,
    pub sentiment_polarity: f32,
    pub tags: Vec<String>,
    pub embedding: Vec<f32>,
}

impl QuestionFixture {
    /// A question whose unit title embedding has cosine `cosine` with `[1, 0]`
    pub fn at_cosine(id: usize, display_title: &str, cosine: f32) -> Self {
        Self {
            display_title: display_title.to_string(),
            title: display_title.to_lowercase(),
            body: format!("Body of question {}: {}", id, display_title),
            url: format!("https://stackoverflow.com/questions/{}", id),
            votes: 0.0,
            popularity_norm: 0.0,
            sentiment_polarity: 0.0,
            tags: Vec::new(),
            embedding: vec![cosine, (1.0 - cosine * cosine).sqrt()],
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn with_votes(mut self, votes: f64, popularity_norm: f32) -> Self {
        self.votes = votes;
        self.popularity_norm = popularity_norm;
        self
    }

    pub fn with_sentiment(mut self, sentiment_polarity: f32) -> Self {
        self.sentiment_polarity = sentiment_polarity;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

/// Serializable tag-model artifacts
#[derive(Debug, Clone)]
pub struct TagModelFixture {
    pub tokenizer: TokenizerConfig,
    pub classifier: ClassifierWeights,
    pub tags: Vec<String>,
}

/// Factory for fixture artifacts
pub struct FixtureFactory;

impl FixtureFactory {
    /// Dimension of every fixture vector
    pub const DIMENSIONS: usize = 2;

    /// Word vectors: "test" and "query" point along `[1, 0]`
    pub fn word_vectors() -> Vec<(String, Vec<f32>)> {
        [
            ("test", vec![1.0, 0.0]),
            ("query", vec![3.0, 0.0]),
            ("python", vec![0.6, 0.8]),
            ("javascript", vec![0.0, 1.0]),
            ("list", vec![0.8, 0.6]),
        ]
        .into_iter()
        .map(|(w, v)| (w.to_string(), v))
        .collect()
    }

    /// Three items at cosines 0.9, 0.5 and 0.1 with identical boosts
    pub fn three_item_scenario() -> Vec<QuestionFixture> {
        [(0.9, "Best match"), (0.5, "Middle match"), (0.1, "Weak match")]
            .into_iter()
            .enumerate()
            .map(|(i, (cosine, title))| {
                QuestionFixture::at_cosine(i, title, cosine)
                    .with_votes(12.0, 0.5)
                    .with_sentiment(0.2)
            })
            .collect()
    }

    /// A tagged corpus for vocabulary construction
    pub fn programming_corpus() -> Vec<QuestionFixture> {
        vec![
            QuestionFixture::at_cosine(0, "Sort a list in Python", 0.8)
                .with_body("How do I sort a Python list of tuples by the second item?")
                .with_votes(340.0, 0.9)
                .with_tags(&["python", "list", "sorting"]),
            QuestionFixture::at_cosine(1, "Await inside a loop", 0.3)
                .with_body("Awaiting a JavaScript promise inside forEach does not wait.")
                .with_votes(120.0, 0.6)
                .with_sentiment(-0.3)
                .with_tags(&["javascript", "promise"]),
            QuestionFixture::at_cosine(2, "Reverse a list", 0.6)
                .with_body("Is there a built-in way to reverse a list in Python?")
                .with_votes(80.0, 0.4)
                .with_tags(&["python", "list"]),
            QuestionFixture::at_cosine(3, "Parse JSON in JavaScript", 0.2)
                .with_body("JSON.parse throws on trailing commas.")
                .with_votes(15.0, 0.1)
                .with_tags(&["javascript", "json"]),
        ]
    }

    /// Tag model over the vocabulary `["javascript", "python"]`
    ///
    /// "python" drives the python output above 0.5 and "javascript" the
    /// javascript output; any other text yields no tags.
    pub fn tag_model() -> TagModelFixture {
        let word_index = [("python", 1), ("javascript", 2), ("list", 3), ("promise", 4)]
            .into_iter()
            .map(|(w, i)| (w.to_string(), i))
            .collect();

        let classifier = ClassifierWeights {
            embedding: vec![
                vec![0.0, 0.0],
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.1, 0.0],
                vec![0.0, 0.1],
            ],
            pooling: Pooling::Max,
            dense: vec![DenseLayer {
                // outputs in vocabulary order: javascript, python
                kernel: vec![vec![-2.0, 8.0], vec![8.0, -2.0]],
                bias: vec![-1.0, -1.0],
                activation: Activation::Sigmoid,
            }],
        };

        TagModelFixture {
            tokenizer: TokenizerConfig::from_word_index(word_index),
            classifier,
            tags: vec!["javascript".to_string(), "python".to_string()],
        }
    }
}
